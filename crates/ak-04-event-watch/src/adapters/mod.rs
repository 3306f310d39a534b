pub mod blocking;
pub mod scheduler;

pub use blocking::BlockingSourceAdapter;
pub use scheduler::{StopHandle, TaskScheduler, ThreadScheduler};
