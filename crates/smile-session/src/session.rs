//! The shared, lock-serialized smile session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smile_core::{
    Effect, FaceFrame, Input, Notification, SessionEvent, SessionSnapshot, SmileMachine,
    SmileSignal,
};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::ticker::{self, Ticker};
use crate::{SessionConfig, SessionError};

/// A smile session that turns frame signals into an accumulated smiling time.
///
/// See the [crate documentation](crate) for thread safety.
#[derive(Clone)]
pub struct SmileSession {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    inner: Mutex<Inner>,
    notifications: broadcast::Sender<Notification>,
    runtime: Handle,
}

struct Inner {
    machine: SmileMachine,
    generation: u64,
    ticker: Option<Ticker>,
    closed: bool,
}

impl std::fmt::Debug for SmileSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmileSession")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl SmileSession {
    /// Creates a session on the current tokio runtime.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Ok(Self::with_handle(config, Handle::try_current()?))
    }

    /// Creates a session whose ticker runs on `runtime`.
    pub fn with_handle(config: SessionConfig, runtime: Handle) -> Self {
        let (notifications, _) = broadcast::channel(config.channel_capacity.max(1));
        let inner = Inner {
            machine: SmileMachine::new(config.tick_period),
            generation: 0,
            ticker: None,
            closed: false,
        };
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                notifications,
                runtime,
            }),
        }
    }

    /// Feeds one frame classification.
    pub fn on_signal(&self, signal: &SmileSignal) {
        trace!(is_smiling = signal.is_smiling, observed_at = %signal.observed_at, "signal");
        self.shared.apply(Input::Signal(signal.is_smiling));
    }

    /// Feeds a raw detector frame; frames without faces are ignored.
    pub fn on_faces(&self, frame: &FaceFrame) {
        if let Some(signal) = frame.signal() {
            self.on_signal(&signal);
        }
    }

    /// Suspends accumulation and resets the elapsed duration to zero.
    pub fn enter_background(&self) {
        self.shared.apply(Input::EnterBackground);
    }

    /// Re-enables accumulation and refreshes the display. Ticking resumes on
    /// the next smiling signal.
    pub fn enter_foreground(&self) {
        self.shared.apply(Input::EnterForeground);
    }

    /// Dispatches an inbound event record.
    pub fn handle_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Signal(signal) => self.on_signal(signal),
            SessionEvent::Faces(frame) => self.on_faces(frame),
            SessionEvent::Background { .. } => self.enter_background(),
            SessionEvent::Foreground { .. } => self.enter_foreground(),
        }
    }

    /// Subscribes to display notifications emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.shared.notifications.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().machine.snapshot()
    }

    /// Ends the session: stops the ticker and ignores every later event.
    pub fn shutdown(&self) {
        let mut inner = self.shared.lock();
        if !inner.closed {
            debug!(elapsed = %inner.machine.display(), "session closed");
        }
        inner.closed = true;
        inner.ticker = None;
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(self: &Arc<Self>, input: Input) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        let effects = inner.machine.apply(input);
        self.perform(&mut inner, effects);
    }

    /// Applies a tick from the ticker of `generation`. Returns `false` once
    /// that ticker is no longer current.
    pub(crate) fn tick(self: &Arc<Self>, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.ticker.as_ref().map(Ticker::generation) != Some(generation) {
            return false;
        }
        let effects = inner.machine.apply(Input::Tick);
        self.perform(&mut inner, effects);
        true
    }

    fn perform(self: &Arc<Self>, inner: &mut Inner, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartTicker => {
                    inner.generation = inner.generation.wrapping_add(1);
                    let period = inner.machine.period().as_duration();
                    debug!(generation = inner.generation, ?period, "starting ticker");
                    inner.ticker = Some(ticker::spawn(
                        Arc::downgrade(self),
                        &self.runtime,
                        inner.generation,
                        period,
                    ));
                }
                Effect::StopTicker => {
                    if let Some(stopped) = inner.ticker.take() {
                        debug!(generation = stopped.generation(), "stopping ticker");
                    }
                }
                Effect::Notify(notification) => {
                    // No subscribers is not an error.
                    let _ = self.notifications.send(notification);
                }
            }
        }
    }
}
