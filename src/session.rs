use std::{sync::Arc, time::Duration};

use tracing::{debug, info};

use crate::{
    config::TimerConfig,
    display::{Urgency, format_readout},
    error::TimerError,
    timer::{CountdownTimer, TimerListener},
};

const SECS_PER_MINUTE: u64 = 60;

/// Parses a whole, positive number of minutes.
pub fn parse_minutes(input: &str) -> Result<u64, TimerError> {
    let trimmed = input.trim();
    let minutes = trimmed
        .parse::<u64>()
        .map_err(|e| TimerError::InvalidInput(format!("{trimmed:?} is not a number of minutes: {e}")))?;
    if minutes == 0 {
        return Err(TimerError::InvalidInput(
            "minutes must be greater than 0".to_string(),
        ));
    }
    Ok(minutes)
}

/// Owns the current countdown of a frontend and swaps it on every start.
pub struct TimerSession {
    config: TimerConfig,
    listener: Arc<dyn TimerListener>,
    current: Option<CountdownTimer>,
}

impl TimerSession {
    pub fn new<L: TimerListener>(config: TimerConfig, listener: L) -> Self {
        Self::with_listener(config, Arc::new(listener))
    }

    pub fn with_listener(config: TimerConfig, listener: Arc<dyn TimerListener>) -> Self {
        Self {
            config,
            listener,
            current: None,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&CountdownTimer> {
        self.current.as_ref()
    }

    /// Replaces the current countdown with a fresh one of `minutes`.
    pub fn start_minutes(&mut self, minutes: u64) -> Result<&CountdownTimer, TimerError> {
        let seconds = minutes.checked_mul(SECS_PER_MINUTE).ok_or_else(|| {
            TimerError::InvalidInput(format!("{minutes} minutes is too long"))
        })?;

        if let Some(previous) = self.current.take() {
            previous.stop();
        }

        let timer =
            CountdownTimer::with_listener(self.config.update_interval, self.listener.clone())?;
        timer.start(Duration::from_secs(seconds));
        info!(minutes, "countdown session started");

        Ok(self.current.insert(timer))
    }

    /// Parses `input` as minutes and starts on it. An invalid input leaves the
    /// current countdown untouched.
    pub fn start_input(&mut self, input: &str) -> Result<&CountdownTimer, TimerError> {
        let minutes = parse_minutes(input)?;
        self.start_minutes(minutes)
    }

    /// Pauses if time is left. Returns whether the request was forwarded.
    pub fn pause(&self) -> bool {
        match self.running_timer() {
            Some(timer) => {
                timer.pause();
                debug!("countdown session paused");
                true
            }
            None => false,
        }
    }

    /// Resumes if time is left. Returns whether the request was forwarded.
    pub fn resume(&self) -> bool {
        match self.running_timer() {
            Some(timer) => {
                timer.resume();
                debug!("countdown session resumed");
                true
            }
            None => false,
        }
    }

    /// Stops the current countdown, if any.
    pub fn end(&mut self) {
        if let Some(timer) = &self.current {
            timer.stop();
            info!("countdown session ended");
        }
    }

    pub fn time_remaining(&self) -> i64 {
        self.current.as_ref().map_or(0, CountdownTimer::time_remaining)
    }

    pub fn readout(&self) -> String {
        format_readout(self.time_remaining())
    }

    /// `None` until a countdown has been started.
    pub fn urgency(&self) -> Option<Urgency> {
        self.current
            .as_ref()
            .map(|timer| Urgency::classify(timer.time_remaining(), self.config.warn_threshold))
    }

    fn running_timer(&self) -> Option<&CountdownTimer> {
        self.current
            .as_ref()
            .filter(|timer| timer.time_remaining() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ChannelListener, TimerEvent, TimerStatus};

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes(" 5\n").unwrap(), 5);
        assert!(matches!(
            parse_minutes("0"),
            Err(TimerError::InvalidInput(msg)) if msg == "minutes must be greater than 0"
        ));
        assert!(matches!(parse_minutes(""), Err(TimerError::InvalidInput(_))));
        assert!(matches!(parse_minutes("-3"), Err(TimerError::InvalidInput(_))));
        assert!(matches!(parse_minutes("1.5"), Err(TimerError::InvalidInput(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_before_start() {
        let (listener, _events) = ChannelListener::unbounded();
        let mut session = TimerSession::new(TimerConfig::default(), listener);

        assert!(session.current().is_none());
        assert_eq!(session.urgency(), None);
        assert_eq!(session.readout(), "00:00:00:00:00");
        assert!(!session.pause());
        assert!(!session.resume());
        session.end();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_minutes_reports_readout_and_urgency() {
        let (listener, _events) = ChannelListener::unbounded();
        let config = TimerConfig::default().with_warn_threshold_secs(90);
        let mut session = TimerSession::new(config, listener);

        session.start_minutes(2).unwrap();
        assert_eq!(session.time_remaining(), 120_000);
        assert_eq!(session.readout(), "00:00:02:00:00");
        assert_eq!(session.urgency(), Some(Urgency::Running));

        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(session.urgency(), Some(Urgency::Warning));

        tokio::time::sleep(Duration::from_secs(81)).await;
        assert_eq!(session.urgency(), Some(Urgency::Ended));
        assert_eq!(session.readout(), "00:00:00:00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_and_silences_previous_timer() {
        let (listener, events) = ChannelListener::unbounded();
        let config = TimerConfig::default().with_update_interval_ms(1_000);
        let mut session = TimerSession::new(config, listener);

        let first = session.start_minutes(1).unwrap().clone();
        tokio::time::sleep(Duration::from_millis(500)).await;
        session.start_minutes(1).unwrap();

        assert_eq!(first.status(), TimerStatus::Stopped);
        assert_eq!(session.time_remaining(), 60_000);

        tokio::time::sleep(Duration::from_secs(61)).await;
        let mut completions = 0;
        while let Ok(event) = events.try_recv() {
            if event == TimerEvent::Complete {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_input_keeps_current_timer() {
        let (listener, _events) = ChannelListener::unbounded();
        let mut session = TimerSession::new(TimerConfig::default(), listener);

        session.start_input("3").unwrap();
        assert!(session.start_input("soon").is_err());
        assert_eq!(session.time_remaining(), 180_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_resume_and_end() {
        let (listener, _events) = ChannelListener::unbounded();
        let mut session = TimerSession::new(TimerConfig::default(), listener);
        session.start_minutes(1).unwrap();

        tokio::time::sleep(Duration::from_millis(160)).await;
        assert!(session.pause());
        let paused_at = session.time_remaining();
        assert_eq!(paused_at, 59_840);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.time_remaining(), paused_at);
        assert!(session.resume());

        session.end();
        let timer = session.current().unwrap();
        assert_eq!(timer.status(), TimerStatus::Stopped);
        assert!(!session.pause());
        assert!(!session.resume());
    }
}
