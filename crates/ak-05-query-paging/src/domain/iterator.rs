//! Lazy iterators over every page of a query.

use std::iter::FusedIterator;
use std::sync::Arc;

use futures::stream::{self, Stream};
use shared_types::{BlockNumber, Entity};
use tracing::warn;

use super::options::QueryOptions;
use super::pager::{fetch_page, fetch_page_async, Pager};
use crate::error::Result;
use crate::ports::{AsyncQuerySource, QuerySource};

/// Blocking iterator over all matching entities.
///
/// Pages are fetched on demand. After the first page every request is pinned
/// to the block height that page reported, so the result set is a consistent
/// snapshot. A fetch error is yielded once and ends the iteration.
pub struct QueryIterator {
    source: Arc<dyn QuerySource>,
    query: String,
    pager: Pager,
    limit: Option<usize>,
    yielded: usize,
}

impl QueryIterator {
    pub fn new(source: Arc<dyn QuerySource>, query: impl Into<String>, options: QueryOptions) -> Self {
        Self {
            source,
            query: query.into(),
            pager: Pager::new(options),
            limit: None,
            yielded: 0,
        }
    }

    /// Stop after `limit` entities.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Block height of the snapshot. `None` until the first page is fetched.
    pub fn block_number(&self) -> Option<BlockNumber> {
        self.pager.block_number()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pager.pages_fetched()
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded >= limit)
    }
}

impl Iterator for QueryIterator {
    type Item = Result<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit_reached() {
            return None;
        }
        loop {
            if let Some(entity) = self.pager.pop() {
                self.yielded += 1;
                return Some(Ok(entity));
            }
            let options = self.pager.next_request()?;
            match fetch_page(self.source.as_ref(), &self.query, &options) {
                Ok(page) => self.pager.accept(page),
                Err(e) => {
                    warn!(query = %self.query, error = %e, "Query page fetch failed");
                    self.pager.fail();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl FusedIterator for QueryIterator {}

impl std::fmt::Debug for QueryIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryIterator")
            .field("query", &self.query)
            .field("pager", &self.pager)
            .field("limit", &self.limit)
            .finish()
    }
}

/// Async counterpart of [`QueryIterator`].
pub struct AsyncQueryIterator {
    source: Arc<dyn AsyncQuerySource>,
    query: String,
    pager: Pager,
    limit: Option<usize>,
    yielded: usize,
}

impl AsyncQueryIterator {
    pub fn new(
        source: Arc<dyn AsyncQuerySource>,
        query: impl Into<String>,
        options: QueryOptions,
    ) -> Self {
        Self {
            source,
            query: query.into(),
            pager: Pager::new(options),
            limit: None,
            yielded: 0,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn block_number(&self) -> Option<BlockNumber> {
        self.pager.block_number()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pager.pages_fetched()
    }

    pub async fn next(&mut self) -> Option<Result<Entity>> {
        if self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }
        loop {
            if let Some(entity) = self.pager.pop() {
                self.yielded += 1;
                return Some(Ok(entity));
            }
            let options = self.pager.next_request()?;
            match fetch_page_async(self.source.as_ref(), &self.query, &options).await {
                Ok(page) => self.pager.accept(page),
                Err(e) => {
                    warn!(query = %self.query, error = %e, "Query page fetch failed");
                    self.pager.fail();
                    return Some(Err(e));
                }
            }
        }
    }

    /// Drain everything into a vector, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        while let Some(item) = self.next().await {
            entities.push(item?);
        }
        Ok(entities)
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Entity>> + Send {
        stream::unfold(self, |mut iter| async move {
            let item = iter.next().await?;
            Some((item, iter))
        })
    }
}

impl std::fmt::Debug for AsyncQueryIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncQueryIterator")
            .field("query", &self.query)
            .field("pager", &self.pager)
            .field("limit", &self.limit)
            .finish()
    }
}
