//! Async client.

use std::str::FromStr;
use std::sync::Arc;

use ak_01_entity_codec::check_entity_key;
use ak_02_tx_encoding::to_tx_params_for;
use ak_04_event_watch::{AsyncEventCallback, AsyncEventFilter, FilterRegistry};
use ak_05_query_paging::{fetch_page_async, AsyncQueryBuilder, AsyncQueryIterator, QueryOptions};
use arkiv_telemetry::{
    metric_inc, time_histogram, TRANSACTIONS_FAILED, TRANSACTIONS_SUBMITTED, TRANSACTION_DURATION,
};
use shared_types::{
    Address, Attributes, BlockTag, ChangeOwnerOp, DeleteOp, DeletedEvent, Entity, EntityKey,
    EventKind, ExtendOp, ExtendedEvent, Fields, Operations, OwnerChangedEvent, QueryResult,
    TransactionReceipt, TxHash, TxParams, UpdatedEvent,
};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::domain::{
    create_operation, expect_single, finish_receipt, key_query, single_entity, update_operation,
};
use crate::error::Result;
use crate::ports::{AsyncArkivNode, AsyncQuerySource, AsyncTransport, LogSource};

/// Async Arkiv client.
///
/// Mirrors [`ArkivClient`](crate::ArkivClient). Watch poll loops run as
/// tasks on the runtime that started them.
pub struct AsyncArkivClient {
    config: ClientConfig,
    transport: Arc<dyn AsyncTransport>,
    logs: Arc<dyn LogSource>,
    queries: Arc<dyn AsyncQuerySource>,
    filters: FilterRegistry<AsyncEventFilter>,
}

impl AsyncArkivClient {
    pub fn new<N: AsyncArkivNode + 'static>(node: Arc<N>, config: ClientConfig) -> Result<Self> {
        Self::from_parts(node.clone(), node.clone(), node, config)
    }

    pub fn from_parts(
        transport: Arc<dyn AsyncTransport>,
        logs: Arc<dyn LogSource>,
        queries: Arc<dyn AsyncQuerySource>,
        config: ClientConfig,
    ) -> Result<Self> {
        config.validate()?;
        info!(rpc_url = %config.rpc_url, storage = ?config.storage_address, "Async Arkiv client ready");
        Ok(Self {
            config,
            transport,
            logs,
            queries,
            filters: FilterRegistry::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    pub async fn execute(
        &self,
        operations: &Operations,
        tx_params: Option<TxParams>,
    ) -> Result<TransactionReceipt> {
        let params = to_tx_params_for(self.config.storage_address, operations, tx_params)?;
        let _timer = time_histogram!(TRANSACTION_DURATION);

        let tx_hash = match self.transport.send_transaction(params).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                metric_inc!(TRANSACTIONS_FAILED);
                return Err(e.into());
            }
        };
        metric_inc!(TRANSACTIONS_SUBMITTED);
        debug!(tx_hash = ?tx_hash, operations = operations.len(), "Transaction submitted");

        let receipt = self.transport.get_transaction_receipt(tx_hash).await?;
        finish_receipt(tx_hash, &receipt)
    }

    pub async fn create_entity(
        &self,
        payload: Option<Vec<u8>>,
        content_type: Option<String>,
        attributes: Option<Attributes>,
        btl: Option<u64>,
    ) -> Result<(EntityKey, TxHash)> {
        let op = create_operation(&self.config, payload, content_type, attributes, btl);
        let receipt = self.execute(&Operations::from_create(op), None).await?;
        let created = expect_single(EventKind::Created, &receipt.creates, receipt.tx_hash)?;
        Ok((created.entity_key, receipt.tx_hash))
    }

    pub async fn update_entity(
        &self,
        entity_key: EntityKey,
        payload: Option<Vec<u8>>,
        content_type: Option<String>,
        attributes: Option<Attributes>,
        btl: Option<u64>,
    ) -> Result<(UpdatedEvent, TxHash)> {
        let op = update_operation(&self.config, entity_key, payload, content_type, attributes, btl);
        let receipt = self.execute(&Operations::from_update(op), None).await?;
        let updated = expect_single(EventKind::Updated, &receipt.updates, receipt.tx_hash)?;
        Ok((updated, receipt.tx_hash))
    }

    pub async fn extend_entity(
        &self,
        entity_key: EntityKey,
        number_of_blocks: u64,
    ) -> Result<(ExtendedEvent, TxHash)> {
        let op = ExtendOp {
            entity_key,
            number_of_blocks,
        };
        let receipt = self.execute(&Operations::from_extend(op), None).await?;
        let extended = expect_single(EventKind::Extended, &receipt.extensions, receipt.tx_hash)?;
        Ok((extended, receipt.tx_hash))
    }

    pub async fn delete_entity(&self, entity_key: EntityKey) -> Result<(DeletedEvent, TxHash)> {
        let receipt = self
            .execute(&Operations::from_delete(DeleteOp { entity_key }), None)
            .await?;
        let deleted = expect_single(EventKind::Deleted, &receipt.deletes, receipt.tx_hash)?;
        Ok((deleted, receipt.tx_hash))
    }

    pub async fn change_owner(
        &self,
        entity_key: EntityKey,
        new_owner: Address,
    ) -> Result<(OwnerChangedEvent, TxHash)> {
        let op = ChangeOwnerOp {
            entity_key,
            new_owner,
        };
        let receipt = self
            .execute(&Operations::from_change_owner(op), None)
            .await?;
        let changed =
            expect_single(EventKind::OwnerChanged, &receipt.change_owners, receipt.tx_hash)?;
        Ok((changed, receipt.tx_hash))
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub async fn query_entities(&self, query: &str, options: &QueryOptions) -> Result<QueryResult> {
        Ok(fetch_page_async(self.queries.as_ref(), query, options).await?)
    }

    pub fn query_entities_iter(&self, query: &str, options: QueryOptions) -> AsyncQueryIterator {
        AsyncQueryIterator::new(self.queries.clone(), query, options)
    }

    pub fn select(&self, fields: Fields) -> AsyncQueryBuilder {
        AsyncQueryBuilder::new(self.queries.clone(), self.config.query_options()).select(fields)
    }

    pub async fn get_entity(&self, entity_key: EntityKey, fields: Fields) -> Result<Entity> {
        let options = self.config.query_options().with_fields(fields);
        let page = self
            .query_entities(&key_query(&entity_key), &options)
            .await?;
        single_entity(entity_key, page)
    }

    pub async fn entity_exists(&self, entity_key: &str) -> bool {
        if let Err(e) = check_entity_key(entity_key, Some("entity_key")) {
            debug!(entity_key, error = %e, "Not an entity key");
            return false;
        }
        let Ok(key) = EntityKey::from_str(entity_key) else {
            return false;
        };
        self.get_entity(key, Fields::KEY).await.is_ok()
    }

    // =========================================================================
    // WATCHERS
    // =========================================================================

    /// Watch one event kind. With `auto_start` the filter is polling on
    /// return; otherwise call `start().await` on it.
    pub async fn watch(
        &self,
        kind: EventKind,
        callback: AsyncEventCallback,
        from_block: impl Into<BlockTag>,
        auto_start: bool,
    ) -> Result<AsyncEventFilter> {
        let filter = AsyncEventFilter::new(
            kind,
            self.logs.clone(),
            callback,
            from_block.into(),
            self.config.watch_config(),
        );
        if auto_start {
            filter.start().await?;
        }
        self.filters.register(filter.clone());
        Ok(filter)
    }

    async_watch_helpers! {
        watch_entity_created => Created,
        watch_entity_updated => Updated,
        watch_entity_extended => Extended,
        watch_entity_deleted => Deleted,
        watch_entity_expired => Expired,
        watch_entity_owner_changed => OwnerChanged,
    }

    pub async fn cleanup_filters(&self) {
        let filters = self.filters.drain();
        if filters.is_empty() {
            debug!("No active filters to clean up");
            return;
        }
        info!(count = filters.len(), "Cleaning up event filters");
        for filter in filters {
            if let Err(e) = filter.uninstall().await {
                warn!(kind = %filter.kind(), error = %e, "Error cleaning up filter");
            }
        }
    }

    pub fn active_filters(&self) -> Vec<AsyncEventFilter> {
        self.filters.snapshot()
    }
}

impl Drop for AsyncArkivClient {
    /// Uninstall on the current runtime if there is one; otherwise abort the
    /// poll tasks and leave the server-side filters to expire.
    fn drop(&mut self) {
        let filters = self.filters.drain();
        if filters.is_empty() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    for filter in filters {
                        if let Err(e) = filter.uninstall().await {
                            warn!(kind = %filter.kind(), error = %e, "Error cleaning up filter");
                        }
                    }
                });
            }
            Err(_) => {
                warn!(count = filters.len(), "No runtime on drop, aborting filters");
                for filter in filters {
                    filter.abort();
                }
            }
        }
    }
}

impl std::fmt::Debug for AsyncArkivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncArkivClient")
            .field("config", &self.config)
            .field("filters", &self.filters.len())
            .finish()
    }
}
