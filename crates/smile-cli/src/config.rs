//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use smile_core::{TickPeriod, ValidationError};
use smile_session::{DEFAULT_CHANNEL_CAPACITY, SessionConfig};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timer step in milliseconds.
    pub tick_period_ms: u64,
    /// Text shown before the elapsed duration.
    pub label: String,
    /// Text shown when the subject stops smiling.
    pub prompt: String,
    /// Notifications buffered before a slow display starts dropping them.
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_period_ms: u64::from(TickPeriod::DEFAULT),
            label: "Smiling Time".to_string(),
            prompt: "Smile!".to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (SMILE_*)
        figment = figment.merge(Env::prefixed("SMILE_"));

        figment.extract()
    }

    pub fn tick_period(&self) -> Result<TickPeriod, ValidationError> {
        TickPeriod::from_millis(self.tick_period_ms)
    }

    pub fn session_config(&self) -> Result<SessionConfig, ValidationError> {
        Ok(SessionConfig {
            tick_period: self.tick_period()?,
            channel_capacity: self.channel_capacity,
        })
    }
}

/// Returns the platform-specific config directory for smile.
///
/// On Linux: `~/.config/smile`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("smile"))
}
