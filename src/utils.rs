use std::time::Duration;

use tokio::time::Instant;

/// Whole milliseconds elapsed from `earlier` to `later`, zero if `later` is not after it.
pub(crate) fn elapsed_millis(earlier: Instant, later: Instant) -> i64 {
    duration_to_millis(later.saturating_duration_since(earlier))
}

/// Converts a duration to whole milliseconds, saturating at `i64::MAX`.
pub(crate) fn duration_to_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Converts a signed millisecond count to a duration, clamping negatives to zero.
pub(crate) fn millis_to_duration(millis: i64) -> Duration {
    Duration::from_millis(u64::try_from(millis).unwrap_or(0))
}
