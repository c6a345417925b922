use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle, time::Instant};
use tracing::{debug, info, trace};

use crate::{
    error::TimerError,
    timer::{
        Clock, TimerListener, TimerStatus,
        accounting::{Ledger, TickOutcome},
        listener::FnListener,
    },
    utils::duration_to_millis,
};

/// A countdown that notifies a [`TimerListener`] on a fixed cadence and once at zero.
///
/// Cloning yields another handle to the same countdown. Pending ticks are
/// aborted when the last handle is dropped.
#[derive(Clone)]
pub struct CountdownTimer {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    listener: Arc<dyn TimerListener>,
    runtime: Handle,
}

struct State {
    ledger: Ledger,
    /// Bumped whenever the schedule changes; tasks of an older epoch are stale.
    epoch: u64,
    /// The run's single tick source, including its final wait for zero.
    tick_task: Option<JoinHandle<()>>,
}

impl State {
    fn cancel_pending(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
    }
}

/// What the tick task does after handling one tick.
enum TickFlow {
    Continue,
    Finish,
    /// Wait until the deadline, then complete the run.
    CompleteAt(Instant),
}

impl CountdownTimer {
    /// Creates an unstarted timer ticking every `update_interval`.
    ///
    /// Must be called from within a tokio runtime, which the timer keeps using
    /// for its tasks.
    pub fn new<L: TimerListener>(
        update_interval: Duration,
        listener: L,
    ) -> Result<Self, TimerError> {
        Self::with_listener(update_interval, Arc::new(listener))
    }

    /// Creates an unstarted timer notifying `on_update` with the remaining
    /// milliseconds on every tick and `on_complete` once at zero.
    pub fn from_callbacks<U, C>(
        update_interval: Duration,
        on_update: U,
        on_complete: C,
    ) -> Result<Self, TimerError>
    where
        U: Fn(i64) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        Self::new(update_interval, FnListener::new(on_update, on_complete))
    }

    /// Like [`new`](Self::new), sharing an already boxed listener.
    ///
    /// Fails if `update_interval` is below one millisecond or no tokio runtime
    /// is current.
    pub fn with_listener(
        update_interval: Duration,
        listener: Arc<dyn TimerListener>,
    ) -> Result<Self, TimerError> {
        if duration_to_millis(update_interval) < 1 {
            return Err(TimerError::InvalidInterval(format!(
                "update interval({update_interval:?}) must be at least 1ms"
            )));
        }
        let runtime = Handle::try_current()?;

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    ledger: Ledger::new(update_interval),
                    epoch: 0,
                    tick_task: None,
                }),
                listener,
                runtime,
            }),
        })
    }

    /// Starts a new run of `duration`, stopping any run in progress first.
    ///
    /// No update is delivered until the first tick, one interval from now.
    pub fn start(&self, duration: Duration) {
        let _guard = self.shared.runtime.enter();
        let mut state = self.shared.lock();
        if state.ledger.status().is_active() {
            state.ledger.stop();
        }
        state.cancel_pending();

        state.ledger.start(Instant::now(), duration);
        let period = state.ledger.update_interval();
        Shared::spawn_ticker(&self.shared, &mut state, period);

        debug!(duration_ms = state.ledger.remaining_ms(), "countdown started");
    }

    /// Like [`start`](Self::start), taking fractional seconds.
    pub fn start_secs_f64(&self, seconds: f64) -> Result<(), TimerError> {
        let duration = Duration::try_from_secs_f64(seconds)
            .map_err(|e| TimerError::InvalidDuration(format!("{seconds} seconds: {e}")))?;
        self.start(duration);
        Ok(())
    }

    /// Cancels pending ticks and clears the remaining time.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        let previous = state.ledger.stop();
        state.cancel_pending();

        if previous.is_active() {
            debug!(%previous, "countdown stopped");
        }
    }

    /// Holds the remaining time and cancels pending ticks. Only a started run
    /// can be paused.
    pub fn pause(&self) {
        let _guard = self.shared.runtime.enter();
        let mut state = self.shared.lock();
        if !state.ledger.pause(Instant::now()) {
            return;
        }
        state.cancel_pending();

        debug!(remaining_ms = state.ledger.remaining_ms(), "countdown paused");
    }

    /// Continues a paused run. The first tick lands where the next tick was due
    /// at the moment of pausing, and the cadence continues from there.
    pub fn resume(&self) {
        let _guard = self.shared.runtime.enter();
        let mut state = self.shared.lock();
        let Some(delay) = state.ledger.resume(Instant::now()) else {
            return;
        };
        state.cancel_pending();
        Shared::spawn_ticker(&self.shared, &mut state, delay);

        debug!(
            remaining_ms = state.ledger.remaining_ms(),
            delay_ms = duration_to_millis(delay),
            "countdown resumed"
        );
    }

    /// Remaining milliseconds as of the last tick, pause or start.
    pub fn time_remaining(&self) -> i64 {
        self.shared.lock().ledger.remaining_ms()
    }

    /// Current lifecycle state.
    pub fn status(&self) -> TimerStatus {
        self.shared.lock().ledger.status()
    }

    /// Target delay between updates, fixed at construction.
    pub fn update_interval(&self) -> Duration {
        self.shared.lock().ledger.update_interval()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns the periodic tick source. The caller must hold the runtime guard.
    fn spawn_ticker(shared: &Arc<Self>, state: &mut State, first_tick: Duration) {
        let epoch = state.epoch;
        let mut clock = Clock::after(first_tick, state.ledger.update_interval());
        let weak = Arc::downgrade(shared);

        let task = shared.runtime.spawn(async move {
            loop {
                clock.tick().await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                match shared.handle_tick(epoch).await {
                    TickFlow::Continue => {}
                    TickFlow::Finish => break,
                    TickFlow::CompleteAt(deadline) => {
                        // Dropped handles must still cancel the final wait.
                        drop(shared);
                        tokio::time::sleep_until(deadline).await;
                        if let Some(shared) = weak.upgrade() {
                            shared.handle_completion(epoch).await;
                        }
                        break;
                    }
                }
            }
        });
        state.tick_task = Some(task);
    }

    async fn handle_tick(&self, epoch: u64) -> TickFlow {
        let Some((ticked_at, outcome)) = self.account_tick(epoch) else {
            return TickFlow::Finish;
        };

        match outcome {
            TickOutcome::Idle => TickFlow::Finish,
            TickOutcome::Update { remaining_ms } => {
                trace!(remaining_ms, "countdown tick");
                self.listener.on_update(remaining_ms).await;
                TickFlow::Continue
            }
            TickOutcome::ArmCompletion {
                remaining_ms,
                delay,
            } => {
                trace!(remaining_ms, "countdown final tick, completion armed");
                self.listener.on_update(remaining_ms).await;
                TickFlow::CompleteAt(ticked_at + delay)
            }
            TickOutcome::Complete => {
                info!("countdown complete");
                self.listener.on_update(0).await;
                self.listener.on_complete().await;
                TickFlow::Finish
            }
        }
    }

    /// Applies a tick under the lock. `None` if the tick belongs to a stale epoch.
    fn account_tick(&self, epoch: u64) -> Option<(Instant, TickOutcome)> {
        let mut state = self.lock();
        if state.epoch != epoch {
            return None;
        }

        let now = Instant::now();
        let outcome = state.ledger.tick(now);
        if outcome == TickOutcome::Complete {
            // This task is the tick source; detach instead of aborting it.
            drop(state.tick_task.take());
            state.cancel_pending();
        }
        Some((now, outcome))
    }

    async fn handle_completion(&self, epoch: u64) {
        {
            let mut state = self.lock();
            if state.epoch != epoch || state.ledger.status() != TimerStatus::Started {
                return;
            }
            drop(state.tick_task.take());
            state.ledger.stop();
            state.cancel_pending();
        }

        info!("countdown complete");
        self.listener.on_complete().await;
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel_pending();
    }
}
