//! Domain layer for the entity codec.
//!
//! Pure functions, no I/O.

pub mod attributes;
pub mod defaults;
pub mod entity_key;

pub use attributes::*;
pub use defaults::*;
pub use entity_key::*;
