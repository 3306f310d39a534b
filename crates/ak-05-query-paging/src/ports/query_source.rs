//! Query source ports.
//!
//! One call: run `query` with the RPC options object built by
//! [`to_rpc_query_options`](crate::to_rpc_query_options) and return the raw
//! JSON response.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::QueryError;

pub trait QuerySource: Send + Sync {
    fn query(&self, query: &str, options: &Value) -> Result<Value, QueryError>;
}

#[async_trait]
pub trait AsyncQuerySource: Send + Sync {
    async fn query(&self, query: &str, options: &Value) -> Result<Value, QueryError>;
}
