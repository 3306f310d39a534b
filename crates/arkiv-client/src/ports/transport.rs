use async_trait::async_trait;
use shared_types::{RpcReceipt, TxHash, TxParams};

use crate::error::TransportError;

/// Blocking transaction submission.
pub trait Transport: Send + Sync {
    /// Sign and submit, returning the transaction hash.
    fn send_transaction(&self, tx: TxParams) -> Result<TxHash, TransportError>;

    /// Wait for the transaction to be mined and return its receipt.
    fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<RpcReceipt, TransportError>;
}

/// Async transaction submission.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send_transaction(&self, tx: TxParams) -> Result<TxHash, TransportError>;

    async fn get_transaction_receipt(&self, tx_hash: TxHash)
        -> Result<RpcReceipt, TransportError>;
}
