//! Error types for transaction encoding

use rlp::DecoderError;
use shared_types::{AttributeError, OperationsError};
use thiserror::Error;

/// Result type alias for encoding operations
pub type Result<T> = std::result::Result<T, EncodingError>;

/// Errors raised while encoding or decoding a storage transaction
#[derive(Debug, Error)]
pub enum EncodingError {
    /// An attribute value cannot be represented on the wire
    #[error("Attribute error: {0}")]
    Attribute(#[from] AttributeError),

    /// Decoded payload contains no operations
    #[error("Operations error: {0}")]
    Operations(#[from] OperationsError),

    /// Malformed RLP
    #[error("RLP decode error for {field}: {source:?}")]
    Rlp {
        /// Which part of the payload failed
        field: &'static str,
        source: DecoderError,
    },

    /// Well-formed RLP with an unexpected shape
    #[error("Unexpected transaction layout: {0}")]
    Layout(String),
}

impl EncodingError {
    pub(crate) fn rlp(field: &'static str) -> impl FnOnce(DecoderError) -> Self {
        move |source| EncodingError::Rlp { field, source }
    }
}
