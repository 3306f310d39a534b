//! Error types for log decoding.

use shared_types::TxHash;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{event}: missing topic {index}")]
    MissingTopic { event: &'static str, index: usize },

    #[error("{event}: data too short (expected {expected} bytes, got {actual})")]
    DataTooShort {
        event: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{event}: {field} does not fit in 64 bits")]
    Overflow {
        event: &'static str,
        field: &'static str,
    },

    #[error("receipt for {tx_hash:?} has no block number")]
    MissingBlockNumber { tx_hash: TxHash },
}
