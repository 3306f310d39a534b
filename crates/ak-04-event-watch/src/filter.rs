//! Event filters: the user-facing handle for one watched event kind.
//!
//! [`EventFilter`] drives its poll loop on a dedicated thread and is fully
//! blocking. [`AsyncEventFilter`] drives it as a tokio task. Both are cheap
//! to clone; clones control the same filter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arkiv_telemetry::ACTIVE_FILTERS;
use parking_lot::Mutex;
use shared_types::{BlockTag, EventKind};
use tracing::{debug, info, warn};

use crate::adapters::{BlockingSourceAdapter, TaskScheduler, ThreadScheduler};
use crate::domain::{
    AsyncEventCallback, AsyncHandler, BlockingHandler, EventCallback, EventHandler,
    FilterLifecycle, PollLoop, StartAction, WatchConfig,
};
use crate::error::Result;
use crate::ports::{BlockingLogSource, FilterId, LogSource};

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

fn next_local_id() -> u64 {
    NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed)
}

// =============================================================================
// BLOCKING FILTER
// =============================================================================

struct FilterState {
    lifecycle: FilterLifecycle,
    filter_id: Option<FilterId>,
    scheduler: ThreadScheduler,
}

struct FilterInner {
    local_id: u64,
    kind: EventKind,
    from_block: BlockTag,
    config: WatchConfig,
    source: Arc<dyn BlockingLogSource>,
    handler: Arc<dyn EventHandler>,
    state: Mutex<FilterState>,
}

impl Drop for FilterInner {
    fn drop(&mut self) {
        if self.state.get_mut().lifecycle.is_running() {
            ACTIVE_FILTERS.dec();
        }
    }
}

/// Blocking event filter.
#[derive(Clone)]
pub struct EventFilter {
    inner: Arc<FilterInner>,
}

impl EventFilter {
    /// Create a filter in the `Created` state. Nothing touches the node yet.
    pub fn new(
        kind: EventKind,
        source: Arc<dyn BlockingLogSource>,
        callback: EventCallback,
        from_block: BlockTag,
        config: WatchConfig,
    ) -> Self {
        Self {
            inner: Arc::new(FilterInner {
                local_id: next_local_id(),
                kind,
                from_block,
                config,
                source,
                handler: Arc::new(BlockingHandler::new(callback)),
                state: Mutex::new(FilterState {
                    lifecycle: FilterLifecycle::Created,
                    filter_id: None,
                    scheduler: ThreadScheduler::new(),
                }),
            }),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.inner.kind
    }

    pub fn from_block(&self) -> BlockTag {
        self.inner.from_block
    }

    pub fn filter_id(&self) -> Option<FilterId> {
        self.inner.state.lock().filter_id.clone()
    }

    pub fn lifecycle(&self) -> FilterLifecycle {
        self.inner.state.lock().lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle().is_running()
    }

    /// Start polling. Installs the server-side filter on first start.
    pub fn start(&self) -> Result<()> {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        if state.lifecycle.on_start()? == StartAction::AlreadyRunning {
            warn!(kind = %inner.kind, "Filter already running");
            return Ok(());
        }

        let filter_id = if let Some(id) = state.filter_id.clone() {
            id
        } else {
            let id = inner.source.create_filter(inner.kind, inner.from_block)?;
            debug!(kind = %inner.kind, filter_id = %id, from_block = %inner.from_block, "Installed log filter");
            state.filter_id = Some(id.clone());
            id
        };

        let poll_loop = PollLoop::new(
            inner.kind,
            filter_id.clone(),
            Arc::new(BlockingSourceAdapter::new(Arc::clone(&inner.source))),
            Arc::clone(&inner.handler),
            inner.config.poll_interval,
        );
        let name = format!("arkiv-watch-{}-{}", inner.kind, inner.local_id);
        state.scheduler.start(name, poll_loop)?;
        state.lifecycle = FilterLifecycle::Running;
        ACTIVE_FILTERS.inc();

        info!(kind = %inner.kind, filter_id = %filter_id, "Event filter started");
        Ok(())
    }

    /// Stop polling and wait (bounded) for the worker to exit.
    pub fn stop(&self) {
        let inner = &self.inner;
        let stop = {
            let mut state = inner.state.lock();
            if !state.lifecycle.is_running() {
                warn!(kind = %inner.kind, lifecycle = %state.lifecycle, "Filter not running");
                return;
            }
            state.lifecycle = FilterLifecycle::Stopped;
            ACTIVE_FILTERS.dec();
            state.scheduler.signal_stop()
        };
        stop.wait(inner.config.stop_timeout);
        info!(kind = %inner.kind, "Event filter stopped");
    }

    /// Stop if running and remove the server-side filter. Terminal.
    pub fn uninstall(&self) -> Result<()> {
        if self.is_running() {
            self.stop();
        }

        let filter_id = {
            let mut state = self.inner.state.lock();
            if state.lifecycle.is_uninstalled() {
                return Ok(());
            }
            state.lifecycle = FilterLifecycle::Uninstalled;
            state.filter_id.take()
        };

        if let Some(id) = filter_id {
            let removed = self.inner.source.uninstall_filter(&id)?;
            debug!(kind = %self.inner.kind, filter_id = %id, removed, "Uninstalled log filter");
        }
        info!(kind = %self.inner.kind, "Event filter uninstalled");
        Ok(())
    }
}

impl std::fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFilter")
            .field("local_id", &self.inner.local_id)
            .field("kind", &self.inner.kind)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

// =============================================================================
// ASYNC FILTER
// =============================================================================

struct AsyncFilterState {
    lifecycle: FilterLifecycle,
    filter_id: Option<FilterId>,
    scheduler: TaskScheduler,
}

struct AsyncFilterInner {
    local_id: u64,
    kind: EventKind,
    from_block: BlockTag,
    config: WatchConfig,
    source: Arc<dyn LogSource>,
    handler: Arc<dyn EventHandler>,
    state: tokio::sync::Mutex<AsyncFilterState>,
}

impl Drop for AsyncFilterInner {
    fn drop(&mut self) {
        if self.state.get_mut().lifecycle.is_running() {
            ACTIVE_FILTERS.dec();
        }
    }
}

/// Async event filter.
#[derive(Clone)]
pub struct AsyncEventFilter {
    inner: Arc<AsyncFilterInner>,
}

impl AsyncEventFilter {
    pub fn new(
        kind: EventKind,
        source: Arc<dyn LogSource>,
        callback: AsyncEventCallback,
        from_block: BlockTag,
        config: WatchConfig,
    ) -> Self {
        Self {
            inner: Arc::new(AsyncFilterInner {
                local_id: next_local_id(),
                kind,
                from_block,
                config,
                source,
                handler: Arc::new(AsyncHandler::new(callback)),
                state: tokio::sync::Mutex::new(AsyncFilterState {
                    lifecycle: FilterLifecycle::Created,
                    filter_id: None,
                    scheduler: TaskScheduler::new(),
                }),
            }),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.inner.kind
    }

    pub fn from_block(&self) -> BlockTag {
        self.inner.from_block
    }

    pub async fn filter_id(&self) -> Option<FilterId> {
        self.inner.state.lock().await.filter_id.clone()
    }

    pub async fn lifecycle(&self) -> FilterLifecycle {
        self.inner.state.lock().await.lifecycle
    }

    pub async fn is_running(&self) -> bool {
        self.lifecycle().await.is_running()
    }

    /// Start polling on the current runtime.
    pub async fn start(&self) -> Result<()> {
        let inner = &self.inner;
        let mut state = inner.state.lock().await;

        if state.lifecycle.on_start()? == StartAction::AlreadyRunning {
            warn!(kind = %inner.kind, "Filter already running");
            return Ok(());
        }

        let filter_id = if let Some(id) = state.filter_id.clone() {
            id
        } else {
            let id = inner
                .source
                .create_filter(inner.kind, inner.from_block)
                .await?;
            debug!(kind = %inner.kind, filter_id = %id, from_block = %inner.from_block, "Installed log filter");
            state.filter_id = Some(id.clone());
            id
        };

        state.scheduler.start(PollLoop::new(
            inner.kind,
            filter_id.clone(),
            Arc::clone(&inner.source),
            Arc::clone(&inner.handler),
            inner.config.poll_interval,
        ));
        state.lifecycle = FilterLifecycle::Running;
        ACTIVE_FILTERS.inc();

        info!(kind = %inner.kind, filter_id = %filter_id, "Event filter started");
        Ok(())
    }

    /// Abort the poll task and wait until it has unwound.
    pub async fn stop(&self) {
        let inner = &self.inner;
        let task = {
            let mut state = inner.state.lock().await;
            if !state.lifecycle.is_running() {
                warn!(kind = %inner.kind, lifecycle = %state.lifecycle, "Filter not running");
                return;
            }
            state.lifecycle = FilterLifecycle::Stopped;
            ACTIVE_FILTERS.dec();
            state.scheduler.take()
        };
        if let Some(task) = task {
            TaskScheduler::join(task).await;
        }
        info!(kind = %inner.kind, "Event filter stopped");
    }

    /// Stop if running and remove the server-side filter. Terminal.
    pub async fn uninstall(&self) -> Result<()> {
        self.stop_if_running().await;

        let filter_id = {
            let mut state = self.inner.state.lock().await;
            if state.lifecycle.is_uninstalled() {
                return Ok(());
            }
            state.lifecycle = FilterLifecycle::Uninstalled;
            state.filter_id.take()
        };

        if let Some(id) = filter_id {
            let removed = self.inner.source.uninstall_filter(&id).await?;
            debug!(kind = %self.inner.kind, filter_id = %id, removed, "Uninstalled log filter");
        }
        info!(kind = %self.inner.kind, "Event filter uninstalled");
        Ok(())
    }

    /// Abort the task without waiting. For teardown outside async context.
    ///
    /// Returns `false` if the state was locked and nothing was done.
    pub fn abort(&self) -> bool {
        let Ok(mut state) = self.inner.state.try_lock() else {
            return false;
        };
        if state.lifecycle.is_running() {
            state.lifecycle = FilterLifecycle::Stopped;
            ACTIVE_FILTERS.dec();
        }
        state.scheduler.take();
        true
    }

    async fn stop_if_running(&self) {
        if self.is_running().await {
            self.stop().await;
        }
    }
}

impl std::fmt::Debug for AsyncEventFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncEventFilter")
            .field("local_id", &self.inner.local_id)
            .field("kind", &self.inner.kind)
            .finish()
    }
}
