//! Operation construction and receipt checks.

use ak_01_entity_codec::{to_create_op, to_update_op};
use ak_03_event_decoding::to_receipt;
use arkiv_telemetry::{metric_inc, TRANSACTIONS_FAILED};
use shared_types::{
    Attributes, CreateOp, EntityKey, EventKind, RpcReceipt, TransactionReceipt, TxHash, UpdateOp,
};
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Create op with config-level defaults for unset content type and BTL.
pub fn create_operation(
    config: &ClientConfig,
    payload: Option<Vec<u8>>,
    content_type: Option<String>,
    attributes: Option<Attributes>,
    btl: Option<u64>,
) -> CreateOp {
    to_create_op(
        payload,
        content_type.or_else(|| Some(config.default_content_type.clone())),
        attributes,
        btl.or(Some(config.default_btl)),
    )
}

pub fn update_operation(
    config: &ClientConfig,
    entity_key: EntityKey,
    payload: Option<Vec<u8>>,
    content_type: Option<String>,
    attributes: Option<Attributes>,
    btl: Option<u64>,
) -> UpdateOp {
    to_update_op(
        entity_key,
        payload,
        content_type.or_else(|| Some(config.default_content_type.clone())),
        attributes,
        btl.or(Some(config.default_btl)),
    )
}

/// Check the receipt status and decode its events.
pub fn finish_receipt(tx_hash: TxHash, receipt: &RpcReceipt) -> Result<TransactionReceipt> {
    if !receipt.succeeded() {
        metric_inc!(TRANSACTIONS_FAILED);
        error!(tx_hash = ?tx_hash, status = ?receipt.status, "Transaction failed");
        return Err(ClientError::TransactionFailed { tx_hash });
    }
    let decoded = to_receipt(tx_hash, receipt)?;
    debug!(
        tx_hash = ?tx_hash,
        block_number = decoded.block_number,
        events = decoded.event_count(),
        "Transaction confirmed"
    );
    Ok(decoded)
}

/// The one event a single-operation transaction must produce.
pub fn expect_single<T: Clone>(kind: EventKind, events: &[T], tx_hash: TxHash) -> Result<T> {
    match events {
        [event] => Ok(event.clone()),
        _ => Err(ClientError::UnexpectedReceipt {
            kind,
            expected: 1,
            actual: events.len(),
            tx_hash,
        }),
    }
}
