//! Deterministic replay of a recorded event log in virtual time.
//!
//! Instead of a real timer, ticks are scheduled on the event timeline: once
//! the ticker starts at time `t`, ticks fall at `t + P`, `t + 2P`, ... and each
//! tick due at or before an event's timestamp fires before that event. The
//! result is what a live session would show under a perfectly punctual
//! scheduler.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::event::SessionEvent;
use crate::machine::{Effect, Input, Notification, SessionSnapshot, SmileMachine};
use crate::types::TickPeriod;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// Event timestamps must be non-decreasing.
    #[error("event {index} at {at} is earlier than the previous event at {previous}")]
    OutOfOrder {
        index: usize,
        at: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
    /// Scheduling the next tick would leave the representable time range.
    #[error("tick period {0} is too large to schedule")]
    PeriodOutOfRange(TickPeriod),
    /// Recording every tick up to the requested time would be unbounded.
    #[error("replay would record {due} tick notifications, more than the limit of {limit}")]
    TooManyTicks { due: u64, limit: u64 },
}

/// Knobs for [`replay`].
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Record a notification for every tick, not just transitions.
    pub include_ticks: bool,
    /// Keep firing due ticks up to this instant after the last event.
    pub until: Option<DateTime<Utc>>,
}

/// A notification stamped with the virtual time it was emitted at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub notification: Notification,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub notifications: Vec<TimedNotification>,
    pub events: usize,
    pub ticks: u64,
    pub final_state: SessionSnapshot,
}

/// Most tick notifications a replay with `include_ticks` will record.
pub const MAX_RECORDED_TICKS: u64 = 1_000_000;

const NANOS_PER_SEC: i128 = 1_000_000_000;

struct VirtualClock {
    machine: SmileMachine,
    step: TimeDelta,
    now: Option<DateTime<Utc>>,
    next_tick: Option<DateTime<Utc>>,
    ticks: u64,
    include_ticks: bool,
    notifications: Vec<TimedNotification>,
}

impl VirtualClock {
    /// Fires every tick due at or before `at`, then moves the clock to `at`.
    fn advance_to(&mut self, at: DateTime<Utc>) -> Result<(), ReplayError> {
        if let Some(due) = self.next_tick.filter(|due| *due <= at) {
            let step = delta_nanos(self.step);
            let gap = delta_nanos(at - due);
            let due_ticks = u64::try_from(gap / step + 1).unwrap_or(u64::MAX);

            if self.include_ticks {
                if due_ticks > MAX_RECORDED_TICKS {
                    return Err(ReplayError::TooManyTicks {
                        due: due_ticks,
                        limit: MAX_RECORDED_TICKS,
                    });
                }
                self.step_through(at)?;
            } else {
                // Only the final value is observable, so skip straight to the
                // last due tick.
                let last = delta_from_nanos(gap % step)
                    .and_then(|remainder| at.checked_sub_signed(remainder))
                    .ok_or_else(|| self.out_of_range())?;
                self.now = Some(last);
                self.next_tick = Some(self.after(last)?);
                self.ticks = self.ticks.saturating_add(due_ticks);
                self.machine.advance(due_ticks);
            }
        }
        self.now = Some(at);
        Ok(())
    }

    fn step_through(&mut self, at: DateTime<Utc>) -> Result<(), ReplayError> {
        while let Some(due) = self.next_tick.filter(|due| *due <= at) {
            self.now = Some(due);
            self.next_tick = Some(self.after(due)?);
            self.ticks += 1;
            let effects = self.machine.apply(Input::Tick);
            self.perform(effects)?;
        }
        Ok(())
    }

    fn perform(&mut self, effects: Vec<Effect>) -> Result<(), ReplayError> {
        for effect in effects {
            match effect {
                Effect::StartTicker => {
                    self.next_tick = self.now.map(|now| self.after(now)).transpose()?;
                }
                Effect::StopTicker => self.next_tick = None,
                Effect::Notify(notification) => self.notifications.push(TimedNotification {
                    at: self.now,
                    notification,
                }),
            }
        }
        Ok(())
    }

    /// The tick following one at `due`.
    fn after(&self, due: DateTime<Utc>) -> Result<DateTime<Utc>, ReplayError> {
        due.checked_add_signed(self.step).ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> ReplayError {
        ReplayError::PeriodOutOfRange(self.machine.period())
    }
}

fn delta_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * NANOS_PER_SEC + i128::from(delta.subsec_nanos())
}

fn delta_from_nanos(nanos: i128) -> Option<TimeDelta> {
    let secs = i64::try_from(nanos / NANOS_PER_SEC).ok()?;
    let subsec = u32::try_from(nanos % NANOS_PER_SEC).ok()?;
    TimeDelta::new(secs, subsec)
}

/// Replays `events` through a fresh machine.
pub fn replay<'a>(
    events: impl IntoIterator<Item = &'a SessionEvent>,
    period: TickPeriod,
    options: &ReplayOptions,
) -> Result<ReplayReport, ReplayError> {
    let step = TimeDelta::from_std(period.as_duration())
        .map_err(|_| ReplayError::PeriodOutOfRange(period))?;

    let mut clock = VirtualClock {
        machine: SmileMachine::new(period),
        step,
        now: None,
        next_tick: None,
        ticks: 0,
        include_ticks: options.include_ticks,
        notifications: Vec::new(),
    };

    let mut count = 0;
    for (index, event) in events.into_iter().enumerate() {
        count += 1;
        if let Some(at) = event.timestamp() {
            if let Some(previous) = clock.now.filter(|previous| at < *previous) {
                return Err(ReplayError::OutOfOrder {
                    index,
                    at,
                    previous,
                });
            }
            clock.advance_to(at)?;
        }

        let Some(input) = event.input() else {
            continue;
        };
        let effects = clock.machine.apply(input);
        clock.perform(effects)?;
    }

    if let Some(until) = options.until {
        if clock.now.is_none_or(|now| until >= now) {
            clock.advance_to(until)?;
        }
    }

    tracing::debug!(events = count, ticks = clock.ticks, "replay finished");

    Ok(ReplayReport {
        final_state: clock.machine.snapshot(),
        notifications: clock.notifications,
        events: count,
        ticks: clock.ticks,
    })
}
