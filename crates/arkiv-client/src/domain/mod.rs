//! Logic shared by the blocking and async clients. No I/O.

pub mod lookup;
pub mod transactions;

pub use lookup::{key_query, single_entity};
pub use transactions::{create_operation, expect_single, finish_receipt, update_operation};
