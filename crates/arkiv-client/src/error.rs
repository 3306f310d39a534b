//! Client error type.
//!
//! Every lower-layer error converts into [`ClientError`] through `#[from]`,
//! so client methods can use `?` across crate boundaries.

use ak_02_tx_encoding::EncodingError;
use ak_03_event_decoding::DecodeError;
use ak_04_event_watch::WatchError;
use ak_05_query_paging::QueryError;
use shared_types::{EntityKey, EntityKeyError, EventKind, TxHash};
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures reported by a [`Transport`](crate::ports::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    /// No receipt arrived in time
    #[error("Timed out waiting for receipt of {tx_hash:?}")]
    ReceiptTimeout { tx_hash: TxHash },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    EntityKey(#[from] EntityKeyError),

    /// Receipt status was not 1
    #[error("Transaction {tx_hash:?} failed")]
    TransactionFailed { tx_hash: TxHash },

    /// A single-operation call did not produce exactly one matching event
    #[error("Expected {expected} {kind} event(s) in receipt of {tx_hash:?}, got {actual}")]
    UnexpectedReceipt {
        kind: EventKind,
        expected: usize,
        actual: usize,
        tx_hash: TxHash,
    },

    /// `$key` lookup did not return exactly one row
    #[error("Entity {key} not found")]
    EntityNotFound { key: EntityKey },
}
