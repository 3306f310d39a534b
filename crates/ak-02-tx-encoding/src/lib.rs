//! # AK-02 Transaction Encoding
//!
//! Turns an [`Operations`](shared_types::Operations) batch into the exact
//! byte sequence the storage contract expects in a transaction's data field.
//!
//! ## Wire Layout
//!
//! An RLP list of five lists, always in this order:
//!
//! | # | List          | Element                                                        |
//! |---|---------------|----------------------------------------------------------------|
//! | 0 | creates       | `[btl, content_type, payload, string_attrs, numeric_attrs]`     |
//! | 1 | updates       | `[key, content_type, btl, payload, string_attrs, numeric_attrs]`|
//! | 2 | deletes       | `key` (32 bytes, not wrapped)                                  |
//! | 3 | extensions    | `[key, number_of_blocks]`                                      |
//! | 4 | change_owners | `[key, new_owner]`                                             |
//!
//! Attribute lists are `[[name, value], ...]` in insertion order. Two batches
//! with the same attributes inserted in different orders encode to different
//! bytes.
//!
//! ## Failure Modes
//!
//! - `EncodingError::Attribute`: a negative or out-of-range numeric attribute.
//!   Encoding aborts and returns no bytes.
//! - Empty batches cannot be constructed, so the encoder does not check.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{EncodingError, Result};
