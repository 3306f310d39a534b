//! Outbound ports.

pub mod log_source;

pub use log_source::{BlockingLogSource, FilterId, FilterSpec, LogSource};
