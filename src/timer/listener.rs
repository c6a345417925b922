use async_channel::{Receiver, Sender, TrySendError};

use crate::timer::TimerEvent;

/// Receives the notifications of a [`CountdownTimer`](crate::timer::CountdownTimer).
///
/// Both methods are called with no timer lock held, so an implementation may
/// call back into the timer (for example `time_remaining` or `pause`).
#[async_trait::async_trait]
pub trait TimerListener: Send + Sync + 'static {
    /// Called on every tick while running.
    async fn on_update(&self, remaining_ms: i64);

    /// Called once when the run reaches zero.
    async fn on_complete(&self);
}

/// Adapts a pair of closures into a [`TimerListener`].
pub struct FnListener<U, C> {
    on_update: U,
    on_complete: C,
}

impl<U, C> FnListener<U, C>
where
    U: Fn(i64) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
{
    pub fn new(on_update: U, on_complete: C) -> Self {
        Self {
            on_update,
            on_complete,
        }
    }
}

#[async_trait::async_trait]
impl<U, C> TimerListener for FnListener<U, C>
where
    U: Fn(i64) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
{
    async fn on_update(&self, remaining_ms: i64) {
        (self.on_update)(remaining_ms);
    }

    async fn on_complete(&self) {
        (self.on_complete)();
    }
}

/// Forwards notifications as [`TimerEvent`]s over an async channel.
///
/// Updates are dropped when a bounded channel is full, since the next tick
/// supersedes them. Completion waits for capacity.
pub struct ChannelListener {
    sender: Sender<TimerEvent>,
}

impl ChannelListener {
    pub fn new(sender: Sender<TimerEvent>) -> Self {
        Self { sender }
    }

    pub fn bounded(capacity: usize) -> (Self, Receiver<TimerEvent>) {
        let (sender, receiver) = async_channel::bounded(capacity);
        (Self::new(sender), receiver)
    }

    pub fn unbounded() -> (Self, Receiver<TimerEvent>) {
        let (sender, receiver) = async_channel::unbounded();
        (Self::new(sender), receiver)
    }
}

#[async_trait::async_trait]
impl TimerListener for ChannelListener {
    async fn on_update(&self, remaining_ms: i64) {
        match self.sender.try_send(TimerEvent::Update { remaining_ms }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!(remaining_ms, "timer event channel full, update dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("timer event channel closed");
            }
        }
    }

    async fn on_complete(&self) {
        if self.sender.send(TimerEvent::Complete).await.is_err() {
            tracing::debug!("timer event channel closed before completion");
        }
    }
}
