use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimerError {
    #[error("invalid update interval: {0}")]
    InvalidInterval(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid config value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
