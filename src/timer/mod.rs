pub(crate) mod accounting;
mod clock;
pub mod event;
pub mod listener;
pub mod status;
pub mod timer;

pub(crate) use clock::Clock;
pub use event::TimerEvent;
pub use listener::{ChannelListener, FnListener, TimerListener};
pub use status::TimerStatus;
pub use timer::CountdownTimer;
