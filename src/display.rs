//! Presentation helpers for a countdown readout.

use std::{fmt, time::Duration};

use crate::utils::duration_to_millis;

const MILLIS_PER_CENTI: i64 = 10;
const SECS_PER_MINUTE: i64 = 60;
const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;

/// Formats milliseconds as `DD:HH:MM:SS:CC`. Negative input reads as zero.
///
/// Every field is zero-padded to two digits; days widen past 99.
pub fn format_readout(remaining_ms: i64) -> String {
    let mut rest = remaining_ms.max(0);

    let centis = (rest % 1000) / MILLIS_PER_CENTI;
    rest /= 1000;
    let seconds = rest % SECS_PER_MINUTE;
    rest /= SECS_PER_MINUTE;
    let minutes = rest % MINUTES_PER_HOUR;
    rest /= MINUTES_PER_HOUR;
    let hours = rest % HOURS_PER_DAY;
    let days = rest / HOURS_PER_DAY;

    format!("{days:02}:{hours:02}:{minutes:02}:{seconds:02}:{centis:02}")
}

/// How close a countdown is to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    Running,
    /// Below the warning threshold but not yet at zero.
    Warning,
    Ended,
}

impl Urgency {
    pub fn classify(remaining_ms: i64, warn_threshold: Duration) -> Self {
        if remaining_ms <= 0 {
            Urgency::Ended
        } else if remaining_ms < duration_to_millis(warn_threshold) {
            Urgency::Warning
        } else {
            Urgency::Running
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Urgency::Running => "running",
            Urgency::Warning => "warning",
            Urgency::Ended => "ended",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_readout_fields() {
        assert_eq!(format_readout(0), "00:00:00:00:00");
        assert_eq!(format_readout(1_234), "00:00:00:01:23");
        assert_eq!(format_readout(5 * 60_000), "00:00:05:00:00");
        assert_eq!(format_readout(90 * 60_000 + 59_999), "00:01:30:59:99");
    }

    #[test]
    fn test_format_readout_wraps_hours_into_days() {
        let one_day = 24 * 60 * 60_000;
        assert_eq!(format_readout(one_day), "01:00:00:00:00");
        assert_eq!(format_readout(one_day + 23 * 3_600_000), "01:23:00:00:00");
        assert_eq!(format_readout(150 * one_day), "150:00:00:00:00");
    }

    #[test]
    fn test_format_readout_clamps_negative() {
        assert_eq!(format_readout(-8), "00:00:00:00:00");
    }

    #[test]
    fn test_urgency_thresholds() {
        let warn = Duration::from_secs(60);

        assert_eq!(Urgency::classify(60_000, warn), Urgency::Running);
        assert_eq!(Urgency::classify(59_999, warn), Urgency::Warning);
        assert_eq!(Urgency::classify(1, warn), Urgency::Warning);
        assert_eq!(Urgency::classify(0, warn), Urgency::Ended);
        assert_eq!(Urgency::classify(-16, warn), Urgency::Ended);
    }
}
