//! Replay command: runs a recorded event log through the session machine in
//! virtual time and prints what the display would have shown.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use smile_core::{ReplayOptions, replay};

use crate::Config;
use crate::commands::input::read_events;
use crate::render::Renderer;

pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    config: &Config,
    options: &ReplayOptions,
    json: bool,
) -> Result<()> {
    let period = config.tick_period().context("invalid tick_period_ms")?;
    let events = read_events(reader)?;
    let report = replay(&events, period, options)?;
    let renderer = Renderer::new(config, json);

    for notification in &report.notifications {
        writeln!(writer, "{}", renderer.timed(notification)?)?;
    }

    if !json {
        writeln!(
            writer,
            "Replayed {} events, {} ticks",
            report.events, report.ticks
        )?;
    }
    writeln!(writer, "{}", renderer.snapshot(&report.final_state)?)?;

    Ok(())
}
