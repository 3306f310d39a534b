//! Log source ports.
//!
//! The watch engine needs exactly the three filter calls of the node's
//! JSON-RPC (`eth_newFilter`, `eth_getFilterChanges`, `eth_uninstallFilter`).
//! Implementations live with the transport.

use std::fmt;

use ak_03_event_decoding::topic_for;
use async_trait::async_trait;
use serde::Serialize;
use shared_types::{Address, BlockTag, EventKind, RpcLog, H256};

use crate::error::LogSourceError;

/// Server-side filter handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterId(pub String);

impl FilterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `eth_newFilter` parameters for one event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub address: Address,
    pub from_block: BlockTag,
    pub topics: Vec<Vec<H256>>,
}

impl FilterSpec {
    pub fn for_kind(address: Address, kind: EventKind, from_block: BlockTag) -> Self {
        Self {
            address,
            from_block,
            topics: vec![vec![topic_for(kind)]],
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Async log source.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Install a filter for `kind` logs starting at `from_block`.
    async fn create_filter(
        &self,
        kind: EventKind,
        from_block: BlockTag,
    ) -> Result<FilterId, LogSourceError>;

    /// Logs matched since the previous call, in chain order.
    async fn get_new_entries(&self, filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError>;

    /// Remove the filter. `Ok(false)` if the node did not know it.
    async fn uninstall_filter(&self, filter_id: &FilterId) -> Result<bool, LogSourceError>;
}

/// Blocking log source.
pub trait BlockingLogSource: Send + Sync {
    fn create_filter(&self, kind: EventKind, from_block: BlockTag)
        -> Result<FilterId, LogSourceError>;

    fn get_new_entries(&self, filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError>;

    fn uninstall_filter(&self, filter_id: &FilterId) -> Result<bool, LogSourceError>;
}
