//! Receipt → [`TransactionReceipt`].

use shared_types::{Event, RpcReceipt, TransactionReceipt, TxHash};
use tracing::{debug, info, warn};

use super::decoder::decode_log;
use crate::error::{DecodeError, Result};

/// Bucket every recognised log of a mined transaction by event kind.
///
/// Logs that fail to decode are skipped with a warning. Expiry events are
/// logged but not bucketed.
pub fn to_receipt(tx_hash: TxHash, receipt: &RpcReceipt) -> Result<TransactionReceipt> {
    let block_number = receipt
        .block_number
        .ok_or(DecodeError::MissingBlockNumber { tx_hash })?;

    let mut out = TransactionReceipt::empty(block_number, tx_hash);

    for (index, log) in receipt.logs.iter().enumerate() {
        let event = match decode_log(log) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!(tx_hash = ?tx_hash, log_index = index, error = %e, "Skipping undecodable log");
                continue;
            }
        };

        match event {
            Event::Created(e) => out.creates.push(e),
            Event::Updated(e) => out.updates.push(e),
            Event::Extended(e) => out.extensions.push(e),
            Event::Deleted(e) => out.deletes.push(e),
            Event::OwnerChanged(e) => out.change_owners.push(e),
            Event::Expired(e) => {
                info!(entity_key = %e.entity_key, tx_hash = ?tx_hash, "Entity expired");
            }
        }
    }

    debug!(
        tx_hash = ?tx_hash,
        block_number,
        events = out.event_count(),
        "Decoded transaction receipt"
    );
    Ok(out)
}
