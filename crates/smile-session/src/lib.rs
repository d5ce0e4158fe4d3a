//! Live smile session for the smile timer.
//!
//! Wraps the [`smile_core::SmileMachine`] transition table with the pieces a
//! running app needs:
//! - a single mutex serializing signals, ticks and lifecycle events
//! - a cancellable periodic ticker on the tokio runtime
//! - a broadcast channel delivering display notifications in order
//!
//! # Thread Safety
//!
//! [`SmileSession`] is cheap to clone and every clone drives the same session.
//! All methods are synchronous and never wait on anything but the session
//! mutex, so frame producers, lifecycle callbacks and the ticker can call in
//! from any thread.

mod session;
mod ticker;

use smile_core::TickPeriod;
use thiserror::Error;

pub use session::SmileSession;

/// Default depth of the notification channel before slow subscribers lag.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session was created outside a tokio runtime.
    #[error("smile session requires a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Settings for a [`SmileSession`].
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Fixed step added to the elapsed duration on every tick.
    pub tick_period: TickPeriod,
    /// Notification channel capacity.
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_period: TickPeriod::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
