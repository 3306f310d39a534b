//! Error types for the event watch engine.

use std::any::Any;

use thiserror::Error;

use crate::ports::FilterId;

pub type Result<T> = std::result::Result<T, WatchError>;

/// Filter control errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchError {
    /// `start()` after `uninstall()`
    #[error("Filter has been uninstalled")]
    Uninstalled,

    /// Creating or removing the server-side filter failed
    #[error("Log source error: {0}")]
    LogSource(#[from] LogSourceError),

    /// The poll worker thread could not be spawned
    #[error("Failed to spawn poll worker: {reason}")]
    Spawn { reason: String },
}

/// Errors reported by a [`LogSource`](crate::ports::LogSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogSourceError {
    /// Round trip to the node failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node no longer knows the filter (expired or uninstalled)
    #[error("Filter not found: {0}")]
    FilterNotFound(FilterId),

    /// JSON-RPC error object returned by the node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// Error returned by a watch callback.
///
/// Logged and counted by the poll loop; never stops it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("Callback failed: {0}")]
    Failed(String),

    #[error("Callback panicked: {0}")]
    Panicked(String),
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }
}

impl From<String> for CallbackError {
    fn from(message: String) -> Self {
        Self::Failed(message)
    }
}

impl From<&str> for CallbackError {
    fn from(message: &str) -> Self {
        Self::Failed(message.to_string())
    }
}
