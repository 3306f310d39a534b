//! Outbound ports.
//!
//! A node implementation provides [`Transport`] for transactions, plus the
//! log and query ports re-exported here from the watch and paging crates.

pub mod transport;

pub use ak_04_event_watch::{BlockingLogSource, LogSource};
pub use ak_05_query_paging::{AsyncQuerySource, QuerySource};
pub use transport::{AsyncTransport, Transport};

/// Everything the blocking client needs from a node.
pub trait ArkivNode: Transport + BlockingLogSource + QuerySource {}

impl<T: Transport + BlockingLogSource + QuerySource> ArkivNode for T {}

/// Everything the async client needs from a node.
pub trait AsyncArkivNode: AsyncTransport + LogSource + AsyncQuerySource {}

impl<T: AsyncTransport + LogSource + AsyncQuerySource> AsyncArkivNode for T {}
