//! Query paging domain.

pub mod builder;
pub mod iterator;
pub mod options;
pub mod pager;
pub mod result;

pub use builder::{AsyncQueryBuilder, QueryBuilder};
pub use iterator::{AsyncQueryIterator, QueryIterator};
pub use options::{
    to_rpc_query_options, Direction, OrderBy, OrderKind, QueryOptions, DEFAULT_RESULTS_PER_PAGE,
    MATCH_ALL,
};
pub use pager::{fetch_page, fetch_page_async, Pager};
pub use result::{to_entity, to_query_result};
