use std::time::Duration;

/// Default delay between two polls of one filter.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default upper bound on waiting for a worker thread to exit.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub poll_interval: Duration,
    pub stop_timeout: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

impl WatchConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }
}
