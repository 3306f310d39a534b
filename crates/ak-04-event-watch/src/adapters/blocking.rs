//! Runs a [`BlockingLogSource`] behind the async [`LogSource`] port.
//!
//! Calls execute inline. Only use this on a runtime that owns its thread,
//! such as the one a `ThreadScheduler` worker builds.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{BlockTag, EventKind, RpcLog};

use crate::error::LogSourceError;
use crate::ports::{BlockingLogSource, FilterId, LogSource};

pub struct BlockingSourceAdapter {
    inner: Arc<dyn BlockingLogSource>,
}

impl BlockingSourceAdapter {
    pub fn new(inner: Arc<dyn BlockingLogSource>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LogSource for BlockingSourceAdapter {
    async fn create_filter(
        &self,
        kind: EventKind,
        from_block: BlockTag,
    ) -> Result<FilterId, LogSourceError> {
        self.inner.create_filter(kind, from_block)
    }

    async fn get_new_entries(&self, filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError> {
        self.inner.get_new_entries(filter_id)
    }

    async fn uninstall_filter(&self, filter_id: &FilterId) -> Result<bool, LogSourceError> {
        self.inner.uninstall_filter(filter_id)
    }
}
