//! Core type definitions with validation.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The tick period was zero.
    #[error("tick period must be greater than zero")]
    ZeroTickPeriod,
}

/// Fixed step by which the elapsed duration advances on every tick.
///
/// Always non-zero. Serialized as whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TickPeriod(Duration);

impl TickPeriod {
    /// Observed timer step of the capture app.
    pub const DEFAULT: Self = Self(Duration::from_millis(10));

    /// Creates a tick period after validation.
    pub fn new(period: Duration) -> Result<Self, ValidationError> {
        if period.is_zero() {
            return Err(ValidationError::ZeroTickPeriod);
        }
        Ok(Self(period))
    }

    pub fn from_millis(ms: u64) -> Result<Self, ValidationError> {
        Self::new(Duration::from_millis(ms))
    }

    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Length of `ticks` consecutive periods, saturating at [`Duration::MAX`].
    #[must_use]
    pub fn times(self, ticks: u64) -> Duration {
        const NANOS_PER_SEC: u128 = 1_000_000_000;

        self.0
            .as_nanos()
            .checked_mul(u128::from(ticks))
            .and_then(|total| {
                let secs = u64::try_from(total / NANOS_PER_SEC).ok()?;
                let nanos = u32::try_from(total % NANOS_PER_SEC).ok()?;
                Some(Duration::new(secs, nanos))
            })
            .unwrap_or(Duration::MAX)
    }
}

impl Default for TickPeriod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for TickPeriod {
    type Error = ValidationError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        Self::from_millis(ms)
    }
}

impl From<TickPeriod> for u64 {
    fn from(period: TickPeriod) -> Self {
        u64::try_from(period.0.as_millis()).unwrap_or(Self::MAX)
    }
}

impl fmt::Display for TickPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_period_rejects_zero() {
        assert_eq!(
            TickPeriod::from_millis(0),
            Err(ValidationError::ZeroTickPeriod)
        );
    }

    #[test]
    fn tick_period_times_multiplies_and_saturates() {
        let period = TickPeriod::from_millis(10).unwrap();
        assert_eq!(period.times(0), Duration::ZERO);
        assert_eq!(period.times(150), Duration::from_millis(1_500));
        assert_eq!(TickPeriod::from_millis(u64::MAX).unwrap().times(2), Duration::MAX);
    }

    #[test]
    fn tick_period_default_is_ten_ms() {
        assert_eq!(
            TickPeriod::default().as_duration(),
            Duration::from_millis(10)
        );
        assert_eq!(TickPeriod::default().to_string(), "10ms");
    }

    #[test]
    fn tick_period_deserializes_from_millis() {
        let period: TickPeriod = serde_json::from_str("25").unwrap();
        assert_eq!(period.as_duration(), Duration::from_millis(25));
        assert!(serde_json::from_str::<TickPeriod>("0").is_err());
    }
}
