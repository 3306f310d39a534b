//! # Shared Types Crate
//!
//! Domain entities, operations, lifecycle events and JSON-RPC wire types
//! shared by the Arkiv client crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Validated Construction**: `EntityKey` and `Operations` cannot be built
//!   in an invalid state; parsing and construction fail fast.
//! - **Order Preservation**: `Attributes` keep insertion order, which is part
//!   of the wire encoding.

pub mod entities;
pub mod errors;
pub mod events;
pub mod operations;
pub mod rpc;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use operations::*;
pub use rpc::*;
