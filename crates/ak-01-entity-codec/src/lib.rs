//! # AK-01 Entity Codec
//!
//! Canonical conversions for the two value types every other crate builds on:
//!
//! - **Entity keys**: integer ↔ `0x`-hex ↔ 32 big-endian bytes, plus boundary
//!   validation (`check_entity_key`, `is_entity_key`).
//! - **Attributes**: `split_attributes` partitions an ordered attribute map into
//!   the string and numeric pair lists carried on the wire; `merge_attributes`
//!   folds query-result lists back, dropping `$`-prefixed system attributes.
//!
//! ## Invariants
//!
//! - `entity_key_to_bytes(to_entity_key(n))` is the big-endian encoding of `n`
//!   for every `n` in `[0, 2^256)`.
//! - Numeric attributes are non-negative. A negative value aborts the split
//!   with `AttributeError::NegativeValue`; nothing is clamped.
//! - Insertion order survives the split. Attributes are never sorted.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ak_01_entity_codec::{split_attributes, to_entity_key};
//! use shared_types::{Attributes, U256};
//!
//! let key = to_entity_key(U256::from(42u64));
//! let attrs = Attributes::new().with("type", "note").with("version", 1u64);
//! let (strings, numerics) = split_attributes(&attrs)?;
//! ```

pub mod domain;

pub use domain::*;
