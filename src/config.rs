use std::{env, time::Duration};

use crate::error::TimerError;

pub const UPDATE_INTERVAL_ENV: &str = "COUNTDOWN_UPDATE_INTERVAL_MS";
pub const WARN_THRESHOLD_ENV: &str = "COUNTDOWN_WARN_THRESHOLD_SECS";

/// Roughly one update per frame of a 60Hz display.
const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(16);
const DEFAULT_WARN_THRESHOLD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Target delay between updates. Actual cadence may be coarser.
    pub update_interval: Duration,
    /// Remaining time below which the countdown is shown as a warning.
    pub warn_threshold: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }
}

impl TimerConfig {
    pub fn with_update_interval_ms(mut self, millis: u64) -> Self {
        self.update_interval = Duration::from_millis(millis);
        self
    }

    pub fn with_warn_threshold_secs(mut self, seconds: u64) -> Self {
        self.warn_threshold = Duration::from_secs(seconds);
        self
    }

    /// Defaults overridden by any of the `COUNTDOWN_*` environment variables.
    pub fn from_env() -> Result<Self, TimerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TimerError> {
        let mut config = Self::default();

        if let Some(millis) = parse_var(&lookup, UPDATE_INTERVAL_ENV)? {
            if millis == 0 {
                return Err(TimerError::InvalidConfig {
                    key: UPDATE_INTERVAL_ENV,
                    reason: "must be greater than 0".to_string(),
                });
            }
            config = config.with_update_interval_ms(millis);
        }
        if let Some(seconds) = parse_var(&lookup, WARN_THRESHOLD_ENV)? {
            config = config.with_warn_threshold_secs(seconds);
        }

        Ok(config)
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, TimerError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| TimerError::InvalidConfig {
            key,
            reason: format!("{raw:?}: {e}"),
        })
}
