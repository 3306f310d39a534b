pub mod query_source;

pub use query_source::{AsyncQuerySource, QuerySource};
