//! # Arkiv Client
//!
//! Blocking ([`ArkivClient`]) and async ([`AsyncArkivClient`]) facades over
//! the codec, decoding, watch, and paging crates.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────── ArkivClient ────────────────────────┐
//! create/update ─►│ ak-01 defaults ─► ak-02 encode ─► Transport ─► ak-03 decode │─► TransactionReceipt
//! query/select  ─►│ ak-05 QueryIterator / QueryBuilder ─────────► QuerySource   │─► Entity
//! watch_*       ─►│ ak-04 EventFilter + FilterRegistry ─────────► LogSource     │─► callback(event, tx)
//!                 └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The node itself is an outbound port: anything implementing [`Transport`],
//! [`BlockingLogSource`], and [`QuerySource`] (or their async counterparts)
//! can back a client.
//!
//! ## Operations
//!
//! | Method            | Returns                        | Receipt check              |
//! |-------------------|--------------------------------|----------------------------|
//! | `execute`         | `TransactionReceipt`           | status = 1                 |
//! | `create_entity`   | `(EntityKey, TxHash)`          | exactly one `Created`      |
//! | `update_entity`   | `(UpdatedEvent, TxHash)`       | exactly one `Updated`      |
//! | `extend_entity`   | `(ExtendedEvent, TxHash)`      | exactly one `Extended`     |
//! | `delete_entity`   | `(DeletedEvent, TxHash)`       | exactly one `Deleted`      |
//! | `change_owner`    | `(OwnerChangedEvent, TxHash)`  | exactly one `OwnerChanged` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use arkiv_client::{callback, ArkivClient, ClientConfig};
//! use shared_types::{Attributes, BlockTag, Fields};
//!
//! let client = ArkivClient::new(node, ClientConfig::from_env()?)?;
//! let attrs = Attributes::new().with("type", "note").with("priority", 2u64);
//! let (key, _) = client.create_entity(Some(b"hello".to_vec()), None, Some(attrs), None)?;
//!
//! let notes = client.select(Fields::ALL).where_("type = \"note\"").fetch();
//!
//! let filter = client.watch_entity_deleted(
//!     callback(|event, tx| { println!("{:?} in {:?}", event, tx); Ok(()) }),
//!     BlockTag::Latest,
//!     true,
//! )?;
//! ```

#[macro_use]
mod macros;

pub mod async_client;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;


pub use async_client::AsyncArkivClient;
pub use client::ArkivClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result, TransportError};
pub use ports::{
    ArkivNode, AsyncArkivNode, AsyncQuerySource, AsyncTransport, BlockingLogSource, LogSource,
    QuerySource, Transport,
};

pub use ak_04_event_watch::{
    async_callback, callback, AsyncEventCallback, AsyncEventFilter, CallbackError, EventCallback,
    EventFilter, FilterLifecycle,
};
pub use ak_05_query_paging::{OrderBy, QueryOptions};
