pub mod shutdown;
pub mod time;

pub use shutdown::{Shutdown, ShutdownTrigger, shutdown_channel};
pub use time::{FakeClockProvider, RealTimeProvider, TimeProvider};
