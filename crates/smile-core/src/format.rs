//! `MM:SS.CC` rendering of the elapsed smiling duration.
//!
//! Minutes wrap at 60 (an hour of smiling renders as `00:00.00` again) and the
//! hundredths field is truncated, never rounded.

use std::time::Duration;

const MICROS_PER_CENTI: u128 = 10_000;

/// Formats an elapsed duration as `MM:SS.CC`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format_micros(elapsed.as_micros())
}

/// Formats a number of seconds as `MM:SS.CC`.
///
/// The value is first quantized to the nearest microsecond so that binary
/// representation error (`61.23` is stored as `61.2299999...`) cannot cost a
/// hundredth. Negative and NaN inputs render as zero.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is checked positive and float-to-int casts saturate"
)]
pub fn format_seconds(seconds: f64) -> String {
    if seconds.is_nan() || seconds <= 0.0 {
        return format_micros(0);
    }
    let micros = (seconds * 1_000_000.0).round() as u128;
    format_micros(micros)
}

fn format_micros(micros: u128) -> String {
    let centis_total = micros / MICROS_PER_CENTI;
    let seconds_total = centis_total / 100;

    let minutes = seconds_total / 60 % 60;
    let seconds = seconds_total % 60;
    let centis = centis_total % 100;

    format!("{minutes:02}:{seconds:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert_eq!(format_seconds(0.0), "00:00.00");
        assert_eq!(format_elapsed(Duration::ZERO), "00:00.00");
    }

    #[test]
    fn minutes_seconds_and_hundredths() {
        assert_eq!(format_seconds(61.23), "01:01.23");
        assert_eq!(format_seconds(0.29), "00:00.29");
    }

    #[test]
    fn hundredths_are_truncated() {
        assert_eq!(format_seconds(3599.999), "59:59.99");
        assert_eq!(format_elapsed(Duration::from_millis(1_239)), "00:01.23");
    }

    #[test]
    fn minutes_wrap_at_an_hour() {
        assert_eq!(format_seconds(3600.0), "00:00.00");
        assert_eq!(format_elapsed(Duration::from_secs(3_661)), "01:01.00");
    }

    #[test]
    fn negative_and_nan_render_as_zero() {
        assert_eq!(format_seconds(-4.2), "00:00.00");
        assert_eq!(format_seconds(f64::NAN), "00:00.00");
    }

    #[test]
    fn fixed_step_accumulation_stays_exact() {
        let elapsed = (0..25).fold(Duration::ZERO, |acc, _| acc + Duration::from_millis(10));
        assert_eq!(format_elapsed(elapsed), "00:00.25");
    }
}
