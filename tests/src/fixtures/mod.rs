//! Shared test fixtures.

use std::time::{Duration, Instant};

pub mod node;

pub use node::{InMemoryNode, DEFAULT_SENDER};

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const WAIT_STEP: Duration = Duration::from_millis(5);

/// Spin until `cond` holds or five seconds pass.
pub fn wait_until(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(WAIT_STEP);
    }
    cond()
}

/// Async [`wait_until`]; yields to the runtime between checks.
pub async fn wait_until_async(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(WAIT_STEP).await;
    }
    cond()
}
