pub mod callback;
pub mod config;
pub mod lifecycle;
pub mod poll_loop;
pub mod registry;

pub use callback::{
    async_callback, callback, AsyncEventCallback, AsyncHandler, BlockingHandler, EventCallback,
    EventHandler,
};
pub use config::{WatchConfig, DEFAULT_POLL_INTERVAL, DEFAULT_STOP_TIMEOUT};
pub use lifecycle::{FilterLifecycle, StartAction};
pub use poll_loop::PollLoop;
pub use registry::FilterRegistry;
