//! Fluent query construction.
//!
//! ```ignore
//! let notes = client
//!     .select(Fields::KEY | Fields::ATTRIBUTES)
//!     .where_("type = \"note\"")
//!     .order_by(OrderBy::int("priority").desc())
//!     .limit(50)
//!     .fetch();
//! ```

use std::sync::Arc;

use shared_types::{BlockNumber, Fields};

use super::iterator::{AsyncQueryIterator, QueryIterator};
use super::options::{OrderBy, QueryOptions, MATCH_ALL};
use crate::error::Result;
use crate::ports::{AsyncQuerySource, QuerySource};

/// Builder state shared by the blocking and async builders.
#[derive(Debug, Clone, Default)]
struct QuerySpec {
    condition: Option<String>,
    options: QueryOptions,
    limit: Option<usize>,
}

impl QuerySpec {
    fn query(&self) -> String {
        self.condition
            .clone()
            .unwrap_or_else(|| MATCH_ALL.to_string())
    }

    fn count_options(&self) -> QueryOptions {
        self.options.clone().with_fields(Fields::KEY)
    }
}

macro_rules! builder_setters {
    () => {
        /// Fields to populate on each result.
        pub fn select(mut self, fields: Fields) -> Self {
            self.spec.options.fields = fields;
            self
        }

        pub fn where_(mut self, condition: impl Into<String>) -> Self {
            self.spec.condition = Some(condition.into());
            self
        }

        /// Append a sort key. Earlier keys take precedence.
        pub fn order_by(mut self, order: OrderBy) -> Self {
            self.spec.options.order_by.push(order);
            self
        }

        pub fn at_block(mut self, block: BlockNumber) -> Self {
            self.spec.options.at_block = Some(block);
            self
        }

        /// Cap the number of entities yielded.
        pub fn limit(mut self, limit: usize) -> Self {
            self.spec.limit = Some(limit);
            self
        }

        pub fn page_size(mut self, max_results_per_page: usize) -> Self {
            self.spec.options.max_results_per_page = max_results_per_page;
            self
        }

        /// The query string that will be sent.
        pub fn query(&self) -> String {
            self.spec.query()
        }

        pub fn options(&self) -> &QueryOptions {
            &self.spec.options
        }
    };
}

pub struct QueryBuilder {
    source: Arc<dyn QuerySource>,
    spec: QuerySpec,
}

impl QueryBuilder {
    /// `options` seeds page size and fields, typically from client config.
    pub fn new(source: Arc<dyn QuerySource>, options: QueryOptions) -> Self {
        Self {
            source,
            spec: QuerySpec {
                options,
                ..Default::default()
            },
        }
    }

    builder_setters!();

    pub fn fetch(self) -> QueryIterator {
        let iter = QueryIterator::new(self.source, self.spec.query(), self.spec.options);
        match self.spec.limit {
            Some(limit) => iter.with_limit(limit),
            None => iter,
        }
    }

    /// Count matches, fetching keys only.
    pub fn count(self) -> Result<usize> {
        let mut iter = QueryIterator::new(
            self.source,
            self.spec.query(),
            self.spec.count_options(),
        );
        if let Some(limit) = self.spec.limit {
            iter = iter.with_limit(limit);
        }
        iter.try_fold(0, |count, entity| entity.map(|_| count + 1))
    }
}

pub struct AsyncQueryBuilder {
    source: Arc<dyn AsyncQuerySource>,
    spec: QuerySpec,
}

impl AsyncQueryBuilder {
    pub fn new(source: Arc<dyn AsyncQuerySource>, options: QueryOptions) -> Self {
        Self {
            source,
            spec: QuerySpec {
                options,
                ..Default::default()
            },
        }
    }

    builder_setters!();

    pub fn fetch(self) -> AsyncQueryIterator {
        let iter = AsyncQueryIterator::new(self.source, self.spec.query(), self.spec.options);
        match self.spec.limit {
            Some(limit) => iter.with_limit(limit),
            None => iter,
        }
    }

    pub async fn count(self) -> Result<usize> {
        let mut iter = AsyncQueryIterator::new(
            self.source,
            self.spec.query(),
            self.spec.count_options(),
        );
        if let Some(limit) = self.spec.limit {
            iter = iter.with_limit(limit);
        }
        let mut count = 0;
        while let Some(entity) = iter.next().await {
            entity?;
            count += 1;
        }
        Ok(count)
    }
}
