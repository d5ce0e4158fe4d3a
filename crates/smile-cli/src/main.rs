use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use smile_core::ReplayOptions;
use tracing_subscriber::EnvFilter;

use smile_cli::commands::{format, input, replay, run};
use smile_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr; stdout is the display.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Run { input, json }) => {
            let config = load_config(cli.config.as_deref())?;
            run::run(&config, input.as_deref(), *json)?;
        }
        Some(Commands::Replay {
            input: path,
            json,
            ticks,
            until,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let options = ReplayOptions {
                include_ticks: *ticks,
                until: *until,
            };
            let reader = input::open(path.as_deref())?;
            let mut stdout = std::io::stdout().lock();
            replay::run(reader, &mut stdout, &config, &options, *json)?;
        }
        Some(Commands::Format { seconds }) => {
            // Format doesn't need config
            format::run(&mut std::io::stdout().lock(), *seconds)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
