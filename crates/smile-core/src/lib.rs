//! Core domain logic for the smile timer.
//!
//! This crate contains the fundamental types and logic for:
//! - Machine: debouncing per-frame smile signals and accumulating smiling time
//! - Format: rendering the elapsed duration as `MM:SS.CC`
//! - Replay: running a recorded event log through the machine in virtual time

pub mod event;
pub mod format;
pub mod machine;
pub mod replay;
pub mod signal;
pub mod state;
pub mod types;

pub use event::SessionEvent;
pub use format::{format_elapsed, format_seconds};
pub use machine::{Effect, Input, Notification, SessionSnapshot, SmileMachine};
pub use replay::{ReplayError, ReplayOptions, ReplayReport, TimedNotification, replay};
pub use signal::{DetectedFace, FaceFrame, SmileSignal};
pub use state::{LifecyclePhase, SessionState};
pub use types::{TickPeriod, ValidationError};
