use std::time::Duration;
use tokio::time::Instant;
use tokio::time::{Interval, MissedTickBehavior, interval_at};

/// Periodic tick source for a running countdown.
pub(crate) struct Clock {
    inner: Interval,
}

impl Clock {
    /// First tick after `delay`, then every `period`.
    pub(crate) fn after(delay: Duration, period: Duration) -> Self {
        let mut inner = interval_at(Instant::now() + delay, period);
        // A late tick pushes the cadence back instead of bursting to catch up.
        inner.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { inner }
    }

    pub(crate) async fn tick(&mut self) {
        self.inner.tick().await;
    }
}
