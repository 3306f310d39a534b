//! Watch callbacks and panic isolation.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use shared_types::{Event, TxHash};

use crate::error::CallbackError;

/// Blocking callback, invoked on the filter's worker thread.
pub type EventCallback = Arc<dyn Fn(&Event, TxHash) -> Result<(), CallbackError> + Send + Sync>;

/// Async callback, awaited inside the filter's task.
pub type AsyncEventCallback =
    Arc<dyn Fn(Event, TxHash) -> BoxFuture<'static, Result<(), CallbackError>> + Send + Sync>;

pub fn callback<F>(f: F) -> EventCallback
where
    F: Fn(&Event, TxHash) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn async_callback<F, Fut>(f: F) -> AsyncEventCallback
where
    F: Fn(Event, TxHash) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
{
    Arc::new(move |event, tx_hash| f(event, tx_hash).boxed())
}

/// Uniform dispatch target for the poll loop.
///
/// Implementations turn panics into [`CallbackError::Panicked`].
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: Event, tx_hash: TxHash) -> Result<(), CallbackError>;
}

pub struct BlockingHandler {
    callback: EventCallback,
}

impl BlockingHandler {
    pub fn new(callback: EventCallback) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl EventHandler for BlockingHandler {
    async fn handle(&self, event: Event, tx_hash: TxHash) -> Result<(), CallbackError> {
        let callback = &self.callback;
        catch_unwind(AssertUnwindSafe(|| callback(&event, tx_hash)))
            .unwrap_or_else(|panic| Err(CallbackError::from_panic(panic)))
    }
}

pub struct AsyncHandler {
    callback: AsyncEventCallback,
}

impl AsyncHandler {
    pub fn new(callback: AsyncEventCallback) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl EventHandler for AsyncHandler {
    async fn handle(&self, event: Event, tx_hash: TxHash) -> Result<(), CallbackError> {
        let callback = &self.callback;
        // The callback may panic while building its future, or while polling it.
        let future = match catch_unwind(AssertUnwindSafe(|| callback(event, tx_hash))) {
            Ok(future) => future,
            Err(panic) => return Err(CallbackError::from_panic(panic)),
        };
        AssertUnwindSafe(future)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(CallbackError::from_panic(panic)))
    }
}
