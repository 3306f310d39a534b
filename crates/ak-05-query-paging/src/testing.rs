//! Test doubles for the query source ports.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_types::EntityKey;

use crate::error::QueryError;
use crate::ports::{AsyncQuerySource, QuerySource};

/// Serves `total` entities keyed `1..=total`, paged by offset cursors.
///
/// The first request without `atBlock` reports `head`; later requests echo
/// whatever `atBlock` they carry.
pub struct MockQuerySource {
    total: usize,
    head: u64,
    fail_on_request: Option<usize>,
    pub requests: Mutex<Vec<(String, Value)>>,
}

impl MockQuerySource {
    pub fn new(total: usize, head: u64) -> Self {
        Self {
            total,
            head,
            fail_on_request: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail the n-th request (zero-based) with a transport error.
    pub fn failing_on(mut self, request: usize) -> Self {
        self.fail_on_request = Some(request);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn respond(&self, query: &str, options: &Value) -> Result<Value, QueryError> {
        let index = {
            let mut requests = self.requests.lock();
            requests.push((query.to_string(), options.clone()));
            requests.len() - 1
        };
        if self.fail_on_request == Some(index) {
            return Err(QueryError::Transport("connection reset".into()));
        }

        let offset = options["cursor"]
            .as_str()
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0);
        let page_size = options["resultsPerPage"].as_u64().unwrap_or(100) as usize;
        let end = (offset + page_size).min(self.total);
        let block = options["atBlock"].as_u64().unwrap_or(self.head);

        let data: Vec<Value> = (offset..end)
            .map(|i| {
                json!({
                    "key": EntityKey::from(i as u64 + 1).to_string(),
                    "owner": "0x2222222222222222222222222222222222222222",
                    "expiresAt": block + 1000,
                    "value": "0x",
                    "contentType": "text/plain",
                    "stringAnnotations": [{"key": "type", "value": "note"}],
                    "numericAnnotations": [{"key": "index", "value": i}],
                })
            })
            .collect();

        let cursor = if end < self.total {
            Value::String(end.to_string())
        } else {
            Value::Null
        };
        Ok(json!({ "data": data, "blockNumber": block, "cursor": cursor }))
    }
}

impl QuerySource for MockQuerySource {
    fn query(&self, query: &str, options: &Value) -> Result<Value, QueryError> {
        self.respond(query, options)
    }
}

#[async_trait]
impl AsyncQuerySource for MockQuerySource {
    async fn query(&self, query: &str, options: &Value) -> Result<Value, QueryError> {
        self.respond(query, options)
    }
}
