use std::time::Duration;

use tokio::time::Instant;

use crate::{
    timer::TimerStatus,
    utils::{duration_to_millis, elapsed_millis, millis_to_duration},
};

/// What the driver has to do after a tick was accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// The ledger is not running; nothing to notify.
    Idle,
    /// Notify an update, keep ticking.
    Update { remaining_ms: i64 },
    /// Less than one interval left: notify an update, then complete after `delay`.
    ArmCompletion { remaining_ms: i64, delay: Duration },
    /// The run reached zero and the ledger is stopped.
    Complete,
}

/// Drift-free time accounting for one countdown.
///
/// Remaining time is always derived as `baseline - (now - reference)`. The
/// baseline only moves on pause, so scheduler jitter never compounds.
#[derive(Debug, Clone)]
pub(crate) struct Ledger {
    update_interval_ms: i64,
    status: TimerStatus,
    remaining_ms: i64,
    baseline_ms: i64,
    reference: Instant,
    /// Remaining-time value, on the baseline's scale, at which the next tick is due.
    next_tick_ms: i64,
    interval_offset: Duration,
}

impl Ledger {
    pub(crate) fn new(update_interval: Duration) -> Self {
        Self {
            update_interval_ms: duration_to_millis(update_interval),
            status: TimerStatus::Unstarted,
            remaining_ms: 0,
            baseline_ms: 0,
            reference: Instant::now(),
            next_tick_ms: 0,
            interval_offset: Duration::ZERO,
        }
    }

    pub(crate) fn status(&self) -> TimerStatus {
        self.status
    }

    pub(crate) fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    pub(crate) fn update_interval(&self) -> Duration {
        millis_to_duration(self.update_interval_ms)
    }

    pub(crate) fn start(&mut self, now: Instant, duration: Duration) {
        self.remaining_ms = duration_to_millis(duration);
        self.baseline_ms = self.remaining_ms;
        self.reference = now;
        self.next_tick_ms = self.baseline_ms - self.update_interval_ms;
        self.interval_offset = Duration::ZERO;
        self.status = TimerStatus::Started;
    }

    /// Zeroes the ledger. Returns the status it was in before.
    pub(crate) fn stop(&mut self) -> TimerStatus {
        let previous = self.status;
        self.remaining_ms = 0;
        self.baseline_ms = 0;
        self.next_tick_ms = 0;
        self.interval_offset = Duration::ZERO;
        self.status = TimerStatus::Stopped;
        previous
    }

    /// Folds the time run since `reference` into the baseline and remembers how
    /// far away the next tick boundary was. Returns false if not started.
    pub(crate) fn pause(&mut self, now: Instant) -> bool {
        if self.status != TimerStatus::Started {
            return false;
        }

        self.baseline_ms -= elapsed_millis(self.reference, now);
        let gap = self.baseline_ms - self.next_tick_ms;
        // A boundary reached without its tick observed yet owes a full interval.
        let owed = if gap > 0 {
            gap
        } else {
            self.update_interval_ms - (-gap) % self.update_interval_ms
        };
        self.interval_offset = millis_to_duration(owed);
        self.reference = now;
        self.remaining_ms = self.baseline_ms;
        self.status = TimerStatus::Paused;
        true
    }

    /// Re-anchors on `now`. Returns the delay before the first tick, or `None`
    /// if not paused. The delay never overshoots the time left.
    pub(crate) fn resume(&mut self, now: Instant) -> Option<Duration> {
        if self.status != TimerStatus::Paused {
            return None;
        }

        let delay = self.interval_offset.min(millis_to_duration(self.baseline_ms));
        self.reference = now;
        self.next_tick_ms = self.baseline_ms - duration_to_millis(delay);
        self.status = TimerStatus::Started;
        Some(delay)
    }

    pub(crate) fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.status != TimerStatus::Started {
            return TickOutcome::Idle;
        }

        self.remaining_ms = self.baseline_ms - elapsed_millis(self.reference, now);
        self.next_tick_ms = self.remaining_ms - self.update_interval_ms;

        if self.remaining_ms >= self.update_interval_ms {
            return TickOutcome::Update {
                remaining_ms: self.remaining_ms,
            };
        }

        if self.remaining_ms <= 0 {
            self.stop();
            TickOutcome::Complete
        } else {
            TickOutcome::ArmCompletion {
                remaining_ms: self.remaining_ms,
                delay: millis_to_duration(self.remaining_ms),
            }
        }
    }
}
