//! Error types for entity queries.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Field bitmask has bits outside `Fields::ALL`
    #[error("Invalid field bitmask: {bits:#b}")]
    InvalidFields { bits: u32 },

    /// `max_results_per_page` of zero
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    /// Response is missing a field the request asked for
    #[error("Query response missing '{field}'")]
    MissingField { field: &'static str },

    /// Response field present but unusable
    #[error("Query response field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Round trip to the node failed
    #[error("Query transport error: {0}")]
    Transport(String),
}

impl QueryError {
    pub(crate) fn invalid(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidField {
            field,
            reason: reason.to_string(),
        }
    }
}
