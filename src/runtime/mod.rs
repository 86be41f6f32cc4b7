pub mod clock;
pub mod lifetime;

pub use clock::{Clock, ClockTick, ClockTicker, FixedClock, SystemClock};
