use std::fmt;

/// Lifecycle state of a [`CountdownTimer`](crate::timer::CountdownTimer).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerStatus {
    #[default]
    Unstarted,
    Started,
    Paused,
    Stopped,
}

impl TimerStatus {
    /// A run exists, whether ticking or paused.
    pub fn is_active(self) -> bool {
        matches!(self, TimerStatus::Started | TimerStatus::Paused)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerStatus::Unstarted => "unstarted",
            TimerStatus::Started => "started",
            TimerStatus::Paused => "paused",
            TimerStatus::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
