//! # Error Types
//!
//! Input validation errors shared by every crate in the workspace. These are
//! raised synchronously, before any network interaction.

use thiserror::Error;

/// Malformed entity key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityKeyError {
    /// No key supplied.
    #[error("Entity key should not be empty")]
    Missing,

    /// Key is not `0x` + 64 hex digits long.
    #[error("Entity key should be 66 characters long (0x + 64 hex) but is: {len}")]
    InvalidLength { len: usize },

    /// Key is missing its prefix or contains non-hex digits.
    #[error("Entity key should be a valid hex string: {0}")]
    InvalidHex(String),
}

/// Invalid attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// Numeric attributes must be non-negative.
    #[error("Numeric attributes must be non-negative but found '{value}' for key '{key}'")]
    NegativeValue { key: String, value: i128 },

    /// Numeric attributes are stored as u64 on chain.
    #[error("Numeric attribute '{key}' exceeds u64 range: {value}")]
    ValueOutOfRange { key: String, value: i128 },

    /// Attribute keys cannot be empty.
    #[error("Attribute key must not be empty")]
    EmptyKey,
}

/// Invalid operation batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationsError {
    /// A batch needs at least one create, update, delete, extend or change-owner.
    #[error("At least one operation must be provided")]
    Empty,
}
