//! Display rendering for notifications and snapshots.

use anyhow::Result;
use smile_core::{Notification, SessionSnapshot, TimedNotification};

use crate::Config;

const SMILING_MARKER: &str = "(smiling)";

/// Turns session output into display lines, as text or JSON.
#[derive(Debug, Clone)]
pub struct Renderer {
    label: String,
    prompt: String,
    json: bool,
}

impl Renderer {
    pub fn new(config: &Config, json: bool) -> Self {
        Self {
            label: config.label.clone(),
            prompt: config.prompt.clone(),
            json,
        }
    }

    pub fn notification(&self, notification: &Notification) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string(notification)?);
        }
        Ok(self.text(notification))
    }

    pub fn timed(&self, timed: &TimedNotification) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string(timed)?);
        }
        let at = timed.at.map_or_else(
            || "--:--:--.---".to_string(),
            |at| at.format("%H:%M:%S%.3f").to_string(),
        );
        Ok(format!("{at} {}", self.text(&timed.notification)))
    }

    pub fn snapshot(&self, snapshot: &SessionSnapshot) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string(snapshot)?);
        }
        Ok(self.duration(&snapshot.display))
    }

    fn text(&self, notification: &Notification) -> String {
        match notification {
            Notification::IndicatorChanged { smiling: true } => SMILING_MARKER.to_string(),
            Notification::IndicatorChanged { smiling: false } => self.prompt.clone(),
            Notification::DurationChanged { display, .. } => self.duration(display),
        }
    }

    fn duration(&self, display: &str) -> String {
        format!("{}: {display}", self.label)
    }
}
