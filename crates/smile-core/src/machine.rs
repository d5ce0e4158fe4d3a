//! The smile-session state machine.
//!
//! The machine is a plain value: every input goes through [`SmileMachine::apply`],
//! which mutates the state and returns the side effects the owner must carry
//! out (start or stop the ticker, notify the display). It never schedules
//! anything itself; the same table drives both the live session and the
//! virtual-time replay.
//!
//! | Current | Input | Next | Effects |
//! |---|---|---|---|
//! | `NotSmiling`, `Active` | `Signal(true)` | `Smiling`, `Active` | indicator on, start ticker |
//! | `Smiling`, `Active` | `Signal(false)` | `NotSmiling`, `Active` | stop ticker, indicator off |
//! | `Smiling`, `Active` | `Signal(true)` | unchanged | start ticker if it is stopped |
//! | any, any | `EnterBackground` | same smile state, `Backgrounded` | stop ticker, reset duration |
//! | any, any | `EnterForeground` | same smile state, `Active` | duration notification |
//! | any, `Backgrounded` | `Signal(_)` | unchanged | none |
//! | `Smiling`, `Active`, ticking | `Tick` | unchanged | duration += period, duration notification |

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::format::format_elapsed;
use crate::state::{LifecyclePhase, SessionState};
use crate::types::TickPeriod;

/// An input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// The latest frame classification.
    Signal(bool),
    /// One fixed-period accumulation step.
    Tick,
    /// The host app moved to the background.
    EnterBackground,
    /// The host app returned to the foreground.
    EnterForeground,
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartTicker,
    StopTicker,
    Notify(Notification),
}

/// A change the display layer should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// The smiling indicator flipped.
    IndicatorChanged { smiling: bool },
    /// The elapsed duration should be redrawn.
    DurationChanged { elapsed_ms: u64, display: String },
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub phase: LifecyclePhase,
    pub elapsed_ms: u64,
    pub display: String,
    pub ticking: bool,
}

/// Debounced smiling state plus the fixed-step duration accumulator.
#[derive(Debug, Clone)]
pub struct SmileMachine {
    state: SessionState,
    phase: LifecyclePhase,
    elapsed: Duration,
    ticking: bool,
    period: TickPeriod,
}

impl Default for SmileMachine {
    fn default() -> Self {
        Self::new(TickPeriod::default())
    }
}

impl SmileMachine {
    /// Creates a machine in `NotSmiling × Active` with zero elapsed time.
    pub fn new(period: TickPeriod) -> Self {
        Self {
            state: SessionState::NotSmiling,
            phase: LifecyclePhase::Active,
            elapsed: Duration::ZERO,
            ticking: false,
            period,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub const fn period(&self) -> TickPeriod {
        self.period
    }

    /// Whether the owner should currently have a ticker running.
    pub const fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// The elapsed duration rendered as `MM:SS.CC`.
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            phase: self.phase,
            elapsed_ms: self.elapsed_ms(),
            display: self.display(),
            ticking: self.ticking,
        }
    }

    /// Applies one input and returns the effects the owner must perform.
    pub fn apply(&mut self, input: Input) -> Vec<Effect> {
        match input {
            Input::Signal(is_smiling) => self.on_signal(is_smiling),
            Input::Tick => self.tick(),
            Input::EnterBackground => self.enter_background(),
            Input::EnterForeground => self.enter_foreground(),
        }
    }

    pub fn on_signal(&mut self, is_smiling: bool) -> Vec<Effect> {
        if !self.phase.is_active() {
            trace!(is_smiling, "signal ignored while backgrounded");
            return Vec::new();
        }

        match (self.state, SessionState::from_smiling(is_smiling)) {
            (SessionState::NotSmiling, SessionState::Smiling) => {
                debug!("started smiling");
                self.state = SessionState::Smiling;
                self.ticking = true;
                vec![
                    Effect::Notify(Notification::IndicatorChanged { smiling: true }),
                    Effect::StartTicker,
                ]
            }
            (SessionState::Smiling, SessionState::Smiling) if !self.ticking => {
                debug!("resuming ticker");
                self.ticking = true;
                vec![Effect::StartTicker]
            }
            (SessionState::Smiling, SessionState::NotSmiling) => {
                debug!(elapsed = %self.display(), "stopped smiling");
                self.state = SessionState::NotSmiling;
                let mut effects = Vec::with_capacity(2);
                if self.stop_ticking() {
                    effects.push(Effect::StopTicker);
                }
                effects.push(Effect::Notify(Notification::IndicatorChanged {
                    smiling: false,
                }));
                effects
            }
            (SessionState::Smiling, SessionState::Smiling)
            | (SessionState::NotSmiling, SessionState::NotSmiling) => Vec::new(),
        }
    }

    pub fn tick(&mut self) -> Vec<Effect> {
        self.advance(1)
    }

    /// Applies `ticks` consecutive ticks as one step with a single duration
    /// notification for the final value.
    pub fn advance(&mut self, ticks: u64) -> Vec<Effect> {
        if !(self.ticking && self.state.is_smiling() && self.phase.is_active()) {
            trace!("stale tick dropped");
            return Vec::new();
        }
        if ticks == 0 {
            return Vec::new();
        }
        self.elapsed = self.elapsed.saturating_add(self.period.times(ticks));
        vec![Effect::Notify(self.duration_changed())]
    }

    pub fn enter_background(&mut self) -> Vec<Effect> {
        if self.phase.is_active() {
            debug!(elapsed = %self.display(), "entering background, resetting duration");
        }
        self.phase = LifecyclePhase::Backgrounded;
        self.elapsed = Duration::ZERO;
        if self.stop_ticking() {
            vec![Effect::StopTicker]
        } else {
            Vec::new()
        }
    }

    pub fn enter_foreground(&mut self) -> Vec<Effect> {
        if !self.phase.is_active() {
            debug!("entering foreground");
        }
        self.phase = LifecyclePhase::Active;
        vec![Effect::Notify(self.duration_changed())]
    }

    fn stop_ticking(&mut self) -> bool {
        std::mem::replace(&mut self.ticking, false)
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    fn duration_changed(&self) -> Notification {
        Notification::DurationChanged {
            elapsed_ms: self.elapsed_ms(),
            display: self.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicator(smiling: bool) -> Effect {
        Effect::Notify(Notification::IndicatorChanged { smiling })
    }

    fn ticks(machine: &mut SmileMachine, n: usize) {
        for _ in 0..n {
            machine.tick();
        }
    }

    #[test]
    fn starts_not_smiling_and_active() {
        let machine = SmileMachine::default();
        assert_eq!(machine.state(), SessionState::NotSmiling);
        assert_eq!(machine.phase(), LifecyclePhase::Active);
        assert_eq!(machine.elapsed(), Duration::ZERO);
        assert!(!machine.is_ticking());
    }

    #[test]
    fn true_signal_starts_ticker_once() {
        let mut machine = SmileMachine::default();
        assert_eq!(
            machine.apply(Input::Signal(true)),
            vec![indicator(true), Effect::StartTicker]
        );
        assert!(machine.apply(Input::Signal(true)).is_empty());
        assert!(machine.is_ticking());
    }

    #[test]
    fn single_false_frame_flips_indicator_off() {
        let mut machine = SmileMachine::default();
        let mut flips = Vec::new();
        for is_smiling in [true, true, true, false] {
            flips.push(machine.apply(Input::Signal(is_smiling)));
        }
        assert_eq!(flips[3], vec![Effect::StopTicker, indicator(false)]);
        assert_eq!(machine.state(), SessionState::NotSmiling);
    }

    #[test]
    fn false_signal_while_not_smiling_is_noop() {
        let mut machine = SmileMachine::default();
        assert!(machine.apply(Input::Signal(false)).is_empty());
    }

    #[test]
    fn tick_accumulates_only_while_smiling_and_active() {
        let mut machine = SmileMachine::default();
        assert!(machine.tick().is_empty());

        machine.on_signal(true);
        let effects = machine.tick();
        assert_eq!(
            effects,
            vec![Effect::Notify(Notification::DurationChanged {
                elapsed_ms: 10,
                display: "00:00.01".to_string(),
            })]
        );

        machine.on_signal(false);
        ticks(&mut machine, 5);
        assert_eq!(machine.elapsed(), Duration::from_millis(10));
    }

    #[test]
    fn advance_matches_repeated_ticks() {
        let mut stepped = SmileMachine::default();
        let mut jumped = SmileMachine::default();
        stepped.on_signal(true);
        jumped.on_signal(true);

        ticks(&mut stepped, 25);
        let effects = jumped.advance(25);

        assert_eq!(jumped.elapsed(), stepped.elapsed());
        assert_eq!(
            effects,
            vec![Effect::Notify(Notification::DurationChanged {
                elapsed_ms: 250,
                display: "00:00.25".to_string(),
            })]
        );
    }

    #[test]
    fn advance_saturates_instead_of_overflowing() {
        let mut machine = SmileMachine::new(TickPeriod::from_millis(u64::MAX).unwrap());
        machine.on_signal(true);
        machine.advance(u64::MAX);
        assert_eq!(machine.elapsed(), Duration::MAX);
    }

    #[test]
    fn advance_is_dropped_when_not_ticking() {
        let mut machine = SmileMachine::default();
        assert!(machine.advance(10).is_empty());
        assert_eq!(machine.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_is_non_decreasing_across_signals() {
        let mut machine = SmileMachine::default();
        let mut last = Duration::ZERO;
        let signals = [true, false, true, true, false, false, true];
        for (i, is_smiling) in signals.into_iter().enumerate() {
            machine.on_signal(is_smiling);
            ticks(&mut machine, i);
            assert!(machine.elapsed() >= last);
            last = machine.elapsed();
        }
    }

    #[test]
    fn background_resets_duration_and_stops_ticker() {
        let mut machine = SmileMachine::default();
        machine.on_signal(true);
        ticks(&mut machine, 42);

        assert_eq!(machine.enter_background(), vec![Effect::StopTicker]);
        assert_eq!(machine.elapsed(), Duration::ZERO);
        assert_eq!(machine.state(), SessionState::Smiling);
        assert_eq!(machine.phase(), LifecyclePhase::Backgrounded);
    }

    #[test]
    fn background_resets_even_when_not_smiling() {
        let mut machine = SmileMachine::default();
        machine.on_signal(true);
        ticks(&mut machine, 3);
        machine.on_signal(false);

        assert!(machine.enter_background().is_empty());
        assert_eq!(machine.elapsed(), Duration::ZERO);
    }

    #[test]
    fn background_is_idempotent() {
        let mut once = SmileMachine::default();
        once.on_signal(true);
        ticks(&mut once, 7);
        once.enter_background();

        let mut twice = SmileMachine::default();
        twice.on_signal(true);
        ticks(&mut twice, 7);
        twice.enter_background();
        assert!(twice.enter_background().is_empty());

        assert_eq!(once.snapshot(), twice.snapshot());
    }

    #[test]
    fn signals_ignored_while_backgrounded() {
        let mut machine = SmileMachine::default();
        machine.enter_background();
        assert!(machine.on_signal(true).is_empty());
        assert_eq!(machine.state(), SessionState::NotSmiling);
    }

    #[test]
    fn foreground_notifies_but_does_not_resume_ticking() {
        let mut machine = SmileMachine::default();
        machine.on_signal(true);
        ticks(&mut machine, 10);
        machine.enter_background();

        assert_eq!(
            machine.enter_foreground(),
            vec![Effect::Notify(Notification::DurationChanged {
                elapsed_ms: 0,
                display: "00:00.00".to_string(),
            })]
        );
        assert!(!machine.is_ticking());
        ticks(&mut machine, 10);
        assert_eq!(machine.elapsed(), Duration::ZERO);
    }

    #[test]
    fn foreground_is_idempotent() {
        let mut machine = SmileMachine::default();
        machine.enter_background();
        machine.enter_foreground();
        let before = machine.snapshot();
        machine.enter_foreground();
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn true_signal_after_foreground_restarts_ticker_without_indicator() {
        let mut machine = SmileMachine::default();
        machine.on_signal(true);
        machine.enter_background();
        machine.enter_foreground();

        assert_eq!(machine.on_signal(true), vec![Effect::StartTicker]);
        machine.tick();
        assert_eq!(machine.elapsed(), Duration::from_millis(10));
    }

    #[test]
    fn held_smile_reads_quarter_second() {
        let mut machine = SmileMachine::default();
        machine.on_signal(true);
        ticks(&mut machine, 25);
        assert_eq!(machine.display(), "00:00.25");

        machine.on_signal(false);
        ticks(&mut machine, 25);
        assert_eq!(machine.display(), "00:00.25");

        machine.enter_background();
        assert_eq!(machine.display(), "00:00.00");
    }

    #[test]
    fn notification_serializes_with_type_tag() {
        let notification = Notification::IndicatorChanged { smiling: true };
        let json = serde_json::to_string(&notification).unwrap();
        insta::assert_snapshot!(json, @r#"{"type":"indicator_changed","smiling":true}"#);
    }
}
