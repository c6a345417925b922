/// Notification emitted by a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A tick was accounted; carries the remaining milliseconds at that tick.
    Update { remaining_ms: i64 },
    /// The countdown reached zero. Emitted once per run.
    Complete,
}
