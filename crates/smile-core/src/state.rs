//! Classification and lifecycle states owned by a smile session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Debounced smiling classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotSmiling,
    Smiling,
}

impl SessionState {
    /// Classification implied by a single frame.
    #[must_use]
    pub const fn from_smiling(is_smiling: bool) -> Self {
        if is_smiling { Self::Smiling } else { Self::NotSmiling }
    }

    #[must_use]
    pub const fn is_smiling(self) -> bool {
        matches!(self, Self::Smiling)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotSmiling => "not_smiling",
            Self::Smiling => "smiling",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the host process may currently accumulate time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    #[default]
    Active,
    Backgrounded,
}

impl LifecyclePhase {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Backgrounded => "backgrounded",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
