//! Run command: feeds a live session line by line and prints notifications as
//! they are emitted, with the ticker running in real time.

use std::path::Path;

use anyhow::{Context, Result};
use smile_session::SmileSession;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::Config;
use crate::commands::input::parse_event;
use crate::render::Renderer;

pub fn run(config: &Config, input: Option<&Path>, json: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(drive(config, input, json))
}

async fn drive(config: &Config, input: Option<&Path>, json: bool) -> Result<()> {
    let session_config = config
        .session_config()
        .context("invalid tick_period_ms")?;
    let session = SmileSession::new(session_config)?;
    let renderer = Renderer::new(config, json);

    let display = tokio::spawn(display_loop(session.subscribe(), renderer.clone()));

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let mut lines = reader.lines();
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        line_no += 1;
        match parse_event(&line, line_no) {
            Ok(Some(event)) => session.handle_event(&event),
            Ok(None) => {}
            Err(err) => tracing::warn!("skipping input: {err:#}"),
        }
    }

    session.shutdown();
    let snapshot = session.snapshot();
    tracing::debug!(?snapshot, "input exhausted");

    // Dropping the last handle closes the channel, which ends the display loop.
    drop(session);
    display.await.context("display task failed")??;

    println!("{}", renderer.snapshot(&snapshot)?);
    Ok(())
}

async fn display_loop(
    mut notifications: tokio::sync::broadcast::Receiver<smile_core::Notification>,
    renderer: Renderer,
) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    loop {
        match notifications.recv().await {
            Ok(notification) => {
                let line = renderer.notification(&notification)?;
                stdout.write_all(line.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "display fell behind, dropped notifications");
            }
            Err(RecvError::Closed) => break,
        }
    }
    stdout.flush().await?;
    Ok(())
}
