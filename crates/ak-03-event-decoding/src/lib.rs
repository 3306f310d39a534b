//! # AK-03 Event Decoding
//!
//! Decodes storage contract logs into typed lifecycle [`Event`]s and folds a
//! mined transaction's logs into a [`TransactionReceipt`].
//!
//! [`Event`]: shared_types::Event
//! [`TransactionReceipt`]: shared_types::TransactionReceipt
//!
//! ## Log Layout
//!
//! ```text
//! topics[0]  keccak256(signature)
//! topics[1]  entityKey
//! topics[2]  owner (or old owner)           low 20 bytes
//! topics[3]  new owner (OwnerChanged only)  low 20 bytes
//! data       32-byte words: expiration block(s), then cost
//! ```
//!
//! ## Skip Policy
//!
//! | Input                          | Result                       |
//! |--------------------------------|------------------------------|
//! | unknown topic 0                | `Ok(None)`                   |
//! | legacy `GolemBaseStorage*`     | `Ok(None)`                   |
//! | truncated topics or data       | `Err(DecodeError)`           |
//!
//! [`to_receipt`] never fails on a bad log. It warns and moves on. Only a
//! receipt without a block number is rejected.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{DecodeError, Result};
