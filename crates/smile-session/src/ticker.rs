//! Periodic tick task.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::session::Shared;

/// Handle to a running tick task. Dropping it cancels the task.
#[derive(Debug)]
pub(crate) struct Ticker {
    generation: u64,
    cancel: CancellationToken,
}

impl Ticker {
    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawns a tick task for `generation` on the session's runtime.
pub(crate) fn spawn(
    shared: Weak<Shared>,
    runtime: &Handle,
    generation: u64,
    period: Duration,
) -> Ticker {
    let cancel = CancellationToken::new();
    runtime.spawn(tick_loop(shared, generation, period, cancel.clone()));
    Ticker { generation, cancel }
}

async fn tick_loop(
    shared: Weak<Shared>,
    generation: u64,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !fire(&shared, generation) {
                    break;
                }
            }
        }
    }

    trace!(generation, "ticker exited");
}

/// Applies one tick if `generation` is still the session's live ticker.
///
/// The check happens under the session lock, so a tick racing with the
/// transition that stopped it is dropped instead of counted.
fn fire(shared: &Weak<Shared>, generation: u64) -> bool {
    let Some(shared) = shared.upgrade() else {
        return false;
    };
    shared.tick(generation)
}
