//! Cursor-following page state shared by both iterators.

use std::collections::VecDeque;

use arkiv_telemetry::{metric_inc, time_histogram, QUERY_PAGES_FETCHED, QUERY_PAGE_DURATION};
use serde_json::Value;
use shared_types::{BlockNumber, Cursor, Entity, QueryResult};
use tracing::debug;

use super::options::{to_rpc_query_options, QueryOptions};
use super::result::to_query_result;
use crate::error::Result;
use crate::ports::{AsyncQuerySource, QuerySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    /// Nothing fetched yet.
    Initial,
    /// At least one page fetched.
    Paging,
    /// No more pages, or a fetch failed.
    Done,
}

/// Paging state machine.
///
/// The first request uses the caller's options. Every later request pins
/// `at_block` to the height the first page reported and carries the last
/// cursor.
#[derive(Debug)]
pub struct Pager {
    options: QueryOptions,
    buffer: VecDeque<Entity>,
    cursor: Option<Cursor>,
    block_number: Option<BlockNumber>,
    state: PageState,
    pages: usize,
}

impl Pager {
    pub fn new(options: QueryOptions) -> Self {
        Self {
            options,
            buffer: VecDeque::new(),
            cursor: None,
            block_number: None,
            state: PageState::Initial,
            pages: 0,
        }
    }

    pub fn block_number(&self) -> Option<BlockNumber> {
        self.block_number
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    pub fn pop(&mut self) -> Option<Entity> {
        self.buffer.pop_front()
    }

    pub fn is_done(&self) -> bool {
        self.state == PageState::Done && self.buffer.is_empty()
    }

    /// Options for the next request, or `None` when paging is over.
    pub fn next_request(&mut self) -> Option<QueryOptions> {
        match self.state {
            PageState::Done => None,
            PageState::Initial => Some(self.options.clone()),
            PageState::Paging => match self.cursor.take() {
                None => {
                    self.state = PageState::Done;
                    None
                }
                Some(cursor) => {
                    let mut options = self.options.clone();
                    options.cursor = Some(cursor);
                    options.at_block = self.block_number;
                    Some(options)
                }
            },
        }
    }

    /// Absorb a fetched page.
    pub fn accept(&mut self, page: QueryResult) {
        let first = self.state == PageState::Initial;
        self.pages += 1;

        if !first && page.entities.is_empty() {
            self.state = PageState::Done;
            return;
        }
        if self.block_number.is_none() {
            self.block_number = Some(page.block_number);
        }
        self.cursor = page.cursor;
        self.buffer.extend(page.entities);
        self.state = PageState::Paging;
    }

    pub fn fail(&mut self) {
        self.state = PageState::Done;
        self.buffer.clear();
    }
}

fn prepare(query: &str, options: &QueryOptions) -> Result<Value> {
    options.validate()?;
    let rpc_options = to_rpc_query_options(options);
    debug!(query, options = %rpc_options, "Fetching query page");
    Ok(rpc_options)
}

/// Run one page of `query`.
pub fn fetch_page(
    source: &dyn QuerySource,
    query: &str,
    options: &QueryOptions,
) -> Result<QueryResult> {
    let rpc_options = prepare(query, options)?;
    let _timer = time_histogram!(QUERY_PAGE_DURATION);
    let response = source.query(query, &rpc_options)?;
    metric_inc!(QUERY_PAGES_FETCHED);
    to_query_result(options.fields, &response)
}

/// Async variant of [`fetch_page`].
pub async fn fetch_page_async(
    source: &dyn AsyncQuerySource,
    query: &str,
    options: &QueryOptions,
) -> Result<QueryResult> {
    let rpc_options = prepare(query, options)?;
    let _timer = time_histogram!(QUERY_PAGE_DURATION);
    let response = source.query(query, &rpc_options).await?;
    metric_inc!(QUERY_PAGES_FETCHED);
    to_query_result(options.fields, &response)
}
