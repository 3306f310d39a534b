//! # AK-04 Event Watch
//!
//! Polling filters that deliver decoded storage lifecycle events to user
//! callbacks.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌────────────── PollLoop ──────────────┐
//!  LogSource ──→  │ get_new_entries → decode → dispatch  │ ──→ callback(event, tx_hash)
//!                 │           sleep(poll_interval)        │
//!                 └───────────────────────────────────────┘
//!                      ▲                        ▲
//!              ThreadScheduler            TaskScheduler
//!              (EventFilter)              (AsyncEventFilter)
//! ```
//!
//! ## Lifecycle
//!
//! `Created → Running ⇄ Stopped → Uninstalled`. Starting a running filter or
//! stopping a stopped one logs a warning and returns. Starting an uninstalled
//! filter fails with [`WatchError::Uninstalled`].
//!
//! ## Failure Isolation
//!
//! - A callback error or panic is logged and counted. The next event is
//!   still delivered.
//! - A failed poll is logged and retried after `poll_interval`. There is no
//!   backoff.
//! - Filters share nothing. Stopping one never affects another.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ak_04_event_watch::{callback, EventFilter, WatchConfig};
//!
//! let filter = EventFilter::new(
//!     EventKind::Created,
//!     log_source,
//!     callback(|event, tx_hash| {
//!         println!("{tx_hash:?}: {:?}", event.entity_key());
//!         Ok(())
//!     }),
//!     BlockTag::Latest,
//!     WatchConfig::default(),
//! );
//! filter.start()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod filter;
pub mod ports;

#[cfg(test)]
mod testing;

pub use adapters::{BlockingSourceAdapter, TaskScheduler, ThreadScheduler};
pub use domain::*;
pub use error::{CallbackError, LogSourceError, Result, WatchError};
pub use filter::{AsyncEventFilter, EventFilter};
pub use ports::{BlockingLogSource, FilterId, FilterSpec, LogSource};
