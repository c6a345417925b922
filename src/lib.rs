//! A countdown timer for tokio with drift-free pause and resume.
//!
//! [`CountdownTimer`] derives its remaining time from monotonic instants rather
//! than from counting ticks, notifies a [`TimerListener`] every update interval
//! and exactly once when it reaches zero. [`TimerSession`] is the thin layer a
//! frontend holds on to.

pub mod config;
pub mod display;
pub mod error;
pub mod session;
pub mod timer;
pub(crate) mod utils;

pub use config::TimerConfig;
pub use display::{Urgency, format_readout};
pub use error::TimerError;
pub use session::{TimerSession, parse_minutes};
pub use timer::{
    ChannelListener, CountdownTimer, FnListener, TimerEvent, TimerListener, TimerStatus,
};
