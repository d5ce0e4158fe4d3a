//! Inbound events fed to a smile session, one JSON object per line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::machine::Input;
use crate::signal::{FaceFrame, SmileSignal};

/// An event from the frame source or the host lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A pre-classified frame.
    Signal(SmileSignal),
    /// A raw detector frame, reduced with [`FaceFrame::signal`].
    Faces(FaceFrame),
    /// The host app moved to the background.
    Background {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    },
    /// The host app returned to the foreground.
    Foreground {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    },
}

impl SessionEvent {
    /// When the event happened, if it carries a timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Signal(signal) => Some(signal.observed_at),
            Self::Faces(frame) => Some(frame.observed_at),
            Self::Background { at } | Self::Foreground { at } => *at,
        }
    }

    /// The machine input this event maps to; `None` for a frame with no faces.
    pub fn input(&self) -> Option<Input> {
        match self {
            Self::Signal(signal) => Some(Input::Signal(signal.is_smiling)),
            Self::Faces(frame) => frame.signal().map(|s| Input::Signal(s.is_smiling)),
            Self::Background { .. } => Some(Input::EnterBackground),
            Self::Foreground { .. } => Some(Input::EnterForeground),
        }
    }
}
