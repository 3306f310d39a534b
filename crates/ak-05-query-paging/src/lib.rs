//! # AK-05 Query Paging
//!
//! Paged entity queries against an Arkiv node.
//!
//! ## Architecture
//!
//! ```text
//! QueryBuilder ──fetch()──► QueryIterator ──► Pager ──► fetch_page ──► QuerySource
//!                                               │            │
//!                                               │            ├─ to_rpc_query_options
//!                                               │            └─ to_query_result
//!                                               └─ buffer, cursor, pinned block
//! ```
//!
//! ## Paging Rules
//!
//! | Situation                         | Behaviour                              |
//! |-----------------------------------|----------------------------------------|
//! | First `next()`                    | Fetch page 1 with the caller's options |
//! | Later pages                       | `atBlock` pinned to page 1's height    |
//! | Buffer empty, cursor present      | Fetch the next page                    |
//! | Follow-up page empty              | End                                    |
//! | No cursor                         | End                                    |
//! | Fetch error                       | Yield the error once, then end         |
//!
//! ## Usage Example
//!
//! ```ignore
//! use ak_05_query_paging::{QueryIterator, QueryOptions};
//!
//! let iter = QueryIterator::new(source, "type = \"note\"", QueryOptions::default());
//! for entity in iter {
//!     let entity = entity?;
//!     println!("{:?}", entity.key);
//! }
//! ```

pub mod domain;
pub mod error;
pub mod ports;

#[cfg(test)]
mod testing;

pub use domain::*;
pub use error::{QueryError, Result};
pub use ports::{AsyncQuerySource, QuerySource};
