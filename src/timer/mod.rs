pub mod scheduler;
pub mod stop_range;

pub use scheduler::{DelayHandle, Scheduler, Tick, TimerId, WindowHandle, WindowSpec};
pub use stop_range::StopRange;
