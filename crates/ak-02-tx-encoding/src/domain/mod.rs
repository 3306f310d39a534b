//! Domain layer: wire structs, encoder and transaction parameters.

pub mod encoder;
pub mod params;
pub mod wire;

pub use encoder::{
    from_storage_transaction, rlp_decode_transaction, rlp_encode_transaction,
    to_storage_transaction,
};
pub use params::{to_tx_params, to_tx_params_for, STORAGE_ADDRESS, STORAGE_ADDRESS_LEGACY};
pub use wire::StorageTransaction;
