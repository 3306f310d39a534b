//! Transaction parameters targeting the storage contract.

use primitive_types::{H160, U256};
use shared_types::{Bytes, Operations, TxParams};

use super::encoder::rlp_encode_transaction;
use crate::error::Result;

/// Storage precompile address (`"arkiv"` in ASCII).
pub const STORAGE_ADDRESS: H160 = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x61, 0x72, 0x6b, 0x69, 0x76,
]);

/// Address of the previous storage processor.
pub const STORAGE_ADDRESS_LEGACY: H160 = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x60, 0x13, 0x84, 0x53,
]);

/// Encode `operations` into `base` (or fresh params).
///
/// `to`, `value` and `data` are always overwritten; other fields are kept.
pub fn to_tx_params(operations: &Operations, base: Option<TxParams>) -> Result<TxParams> {
    to_tx_params_for(STORAGE_ADDRESS, operations, base)
}

/// As [`to_tx_params`] with an explicit storage address.
pub fn to_tx_params_for(
    storage_address: H160,
    operations: &Operations,
    base: Option<TxParams>,
) -> Result<TxParams> {
    let data = rlp_encode_transaction(operations)?;
    Ok(TxParams {
        to: Some(storage_address),
        value: Some(U256::zero()),
        data: Some(Bytes(data)),
        ..base.unwrap_or_default()
    })
}
