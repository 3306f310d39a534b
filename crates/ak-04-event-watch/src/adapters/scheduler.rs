//! The two ways a [`PollLoop`] is driven.
//!
//! - [`ThreadScheduler`]: a named OS thread running a current-thread tokio
//!   runtime. Stopped through a shared flag checked once per iteration.
//! - [`TaskScheduler`]: a task on the caller's tokio runtime. Stopped by
//!   aborting the task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::domain::PollLoop;
use crate::error::WatchError;

// =============================================================================
// THREAD SCHEDULER
// =============================================================================

struct Worker {
    name: String,
    handle: thread::JoinHandle<()>,
    done: mpsc::Receiver<()>,
}

pub struct ThreadScheduler {
    running: Arc<AtomicBool>,
    worker: Option<Worker>,
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the worker thread.
    ///
    /// Each start gets a fresh flag so a worker that outlived its stop
    /// timeout cannot be revived by a later start.
    pub fn start(&mut self, name: String, poll_loop: PollLoop) -> Result<(), WatchError> {
        let running = Arc::new(AtomicBool::new(true));
        let (done_tx, done) = mpsc::channel();
        let flag = Arc::clone(&running);
        let thread_name = name.clone();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => {
                        runtime.block_on(poll_loop.run(|| flag.load(Ordering::SeqCst)));
                    }
                    Err(e) => {
                        error!(worker = %thread_name, error = %e, "Failed to build poll runtime");
                    }
                }
                let _ = done_tx.send(());
            })
            .map_err(|e| WatchError::Spawn {
                reason: e.to_string(),
            })?;

        self.running = running;
        self.worker = Some(Worker { name, handle, done });
        Ok(())
    }

    /// Clear the running flag. Wait on the returned handle to join.
    pub fn signal_stop(&mut self) -> StopHandle {
        self.running.store(false, Ordering::SeqCst);
        StopHandle {
            worker: self.worker.take(),
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Best-effort join of a stopped worker.
pub struct StopHandle {
    worker: Option<Worker>,
}

impl StopHandle {
    /// Wait up to `timeout` for the worker to exit.
    ///
    /// Returns `true` if it exited. On timeout the thread is left detached; it
    /// exits on its own at the next flag check.
    pub fn wait(self, timeout: Duration) -> bool {
        let Some(worker) = self.worker else {
            return true;
        };

        // Stopping from inside a callback runs on the worker itself.
        if worker.handle.thread().id() == thread::current().id() {
            debug!(worker = %worker.name, "Stop requested from worker thread, not joining");
            return false;
        }

        match worker.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if worker.handle.join().is_err() {
                    warn!(worker = %worker.name, "Poll worker panicked");
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    worker = %worker.name,
                    timeout_ms = timeout.as_millis() as u64,
                    "Poll worker did not exit in time, detaching"
                );
                false
            }
        }
    }
}

// =============================================================================
// TASK SCHEDULER
// =============================================================================

#[derive(Default)]
pub struct TaskScheduler {
    task: Option<JoinHandle<()>>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawn the loop on the current tokio runtime.
    pub fn start(&mut self, poll_loop: PollLoop) {
        self.task = Some(tokio::spawn(async move {
            poll_loop.run(|| true).await;
        }));
    }

    /// Abort the task and hand it back for awaiting.
    pub fn take(&mut self) -> Option<JoinHandle<()>> {
        let task = self.task.take()?;
        task.abort();
        Some(task)
    }

    /// Await an aborted task until it has fully unwound.
    pub async fn join(task: JoinHandle<()>) {
        match task.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!(error = %e, "Poll task ended abnormally"),
        }
    }
}

impl Drop for TaskScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
