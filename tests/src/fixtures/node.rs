//! In-memory Arkiv node.
//!
//! Mines one block per transaction, applies decoded storage batches to an
//! entity table, emits the storage contract's event logs, serves log
//! filters, and answers a small subset of the query language:
//!
//! | Query              | Matches                             |
//! |--------------------|-------------------------------------|
//! | `1 = 1`            | every live entity                   |
//! | `$key = 0x..`      | one entity by key                   |
//! | `$owner = 0x..`    | entities owned by an address        |
//! | `name = "text"`    | string attribute equality           |
//! | `name = 42`        | numeric attribute equality          |

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use ak_01_entity_codec::{split_attributes, to_rpc_attributes};
use ak_02_tx_encoding::{rlp_decode_transaction, STORAGE_ADDRESS};
use ak_03_event_decoding::topic_for;
use ak_04_event_watch::{BlockingLogSource, FilterId, LogSource, LogSourceError};
use ak_05_query_paging::{AsyncQuerySource, QueryError, QuerySource};
use arkiv_client::{AsyncTransport, Transport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use primitive_types::{H256, U256};
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use shared_types::{
    Address, AttributeValue, Attributes, BlockNumber, BlockTag, Bytes, EntityKey, EventKind,
    Operations, RpcLog, RpcReceipt, TxHash, TxParams,
};

/// Default sender when a transaction carries no `from`.
pub const DEFAULT_SENDER: Address = Address([0x5e; 20]);

#[derive(Debug, Clone)]
struct StoredEntity {
    key: EntityKey,
    owner: Address,
    expires_at: BlockNumber,
    payload: Vec<u8>,
    content_type: String,
    attributes: Attributes,
}

struct LogFilter {
    kind: EventKind,
    next: usize,
}

#[derive(Default)]
struct Chain {
    block: BlockNumber,
    entities: Vec<StoredEntity>,
    logs: Vec<RpcLog>,
    receipts: HashMap<TxHash, RpcReceipt>,
    filters: HashMap<String, LogFilter>,
    next_filter: u64,
    tx_count: u64,
}

/// Shared fake node; wrap in `Arc` and hand to a client.
#[derive(Default)]
pub struct InMemoryNode {
    chain: Mutex<Chain>,
    failing_polls: AtomicUsize,
    polls: AtomicUsize,
    queries: AtomicUsize,
}

impl InMemoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_number(&self) -> BlockNumber {
        self.chain.lock().block
    }

    pub fn entity_count(&self) -> usize {
        self.chain.lock().entities.len()
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn installed_filters(&self) -> usize {
        self.chain.lock().filters.len()
    }

    /// Fail the next `n` log polls with a transport error.
    pub fn fail_next_polls(&self, n: usize) {
        self.failing_polls.store(n, Ordering::SeqCst);
    }

    /// Advance the chain by `n` empty blocks, expiring entities on the way.
    pub fn mine_blocks(&self, n: u64) {
        let mut chain = self.chain.lock();
        for _ in 0..n {
            chain.block += 1;
            expire(&mut chain);
        }
    }

    /// Mine a storage transaction. Reverts (status 0, no logs) when any
    /// operation targets a missing entity.
    fn submit(&self, tx: TxParams) -> Result<TxHash, TransportError> {
        if tx.to != Some(STORAGE_ADDRESS) {
            return Err(TransportError::Rpc {
                code: -32000,
                message: "unknown contract".into(),
            });
        }
        let data = tx.data.map(Bytes::into_vec).unwrap_or_default();
        let operations = rlp_decode_transaction(&data).map_err(|e| TransportError::Rpc {
            code: -32602,
            message: e.to_string(),
        })?;
        let sender = tx.from.unwrap_or(DEFAULT_SENDER);

        let mut chain = self.chain.lock();
        chain.tx_count += 1;
        let tx_hash = hash_words(&[&chain.tx_count.to_be_bytes(), b"tx"]);
        chain.block += 1;
        expire(&mut chain);
        let block = chain.block;

        let receipt = match apply(&chain.entities, &operations, sender, block, tx_hash) {
            Some((entities, mut logs)) => {
                chain.entities = entities;
                for (index, log) in logs.iter_mut().enumerate() {
                    log.log_index = Some(index as u64);
                }
                chain.logs.extend(logs.iter().cloned());
                RpcReceipt {
                    transaction_hash: tx_hash,
                    block_number: Some(block),
                    status: Some(1),
                    logs,
                }
            }
            None => RpcReceipt {
                transaction_hash: tx_hash,
                block_number: Some(block),
                status: Some(0),
                logs: Vec::new(),
            },
        };
        chain.receipts.insert(tx_hash, receipt);
        Ok(tx_hash)
    }

    fn receipt(&self, tx_hash: TxHash) -> Result<RpcReceipt, TransportError> {
        self.chain
            .lock()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or(TransportError::ReceiptTimeout { tx_hash })
    }

    fn create(&self, kind: EventKind, from_block: BlockTag) -> FilterId {
        let mut chain = self.chain.lock();
        let next = match from_block {
            BlockTag::Earliest => 0,
            BlockTag::Number(n) => chain
                .logs
                .iter()
                .position(|log| log.block_number.unwrap_or(0) >= n)
                .unwrap_or(chain.logs.len()),
            BlockTag::Latest | BlockTag::Pending => chain.logs.len(),
        };
        chain.next_filter += 1;
        let id = format!("0x{:x}", chain.next_filter);
        chain.filters.insert(id.clone(), LogFilter { kind, next });
        FilterId::new(id)
    }

    fn entries(&self, filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self
            .failing_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(LogSourceError::Transport("connection refused".into()));
        }

        let mut chain = self.chain.lock();
        let Chain { logs, filters, .. } = &mut *chain;
        let filter = filters
            .get_mut(filter_id.as_str())
            .ok_or_else(|| LogSourceError::FilterNotFound(filter_id.clone()))?;
        let topic = topic_for(filter.kind);
        let out = logs[filter.next..]
            .iter()
            .filter(|log| log.topics.first() == Some(&topic))
            .cloned()
            .collect();
        filter.next = logs.len();
        Ok(out)
    }

    fn uninstall(&self, filter_id: &FilterId) -> bool {
        self.chain.lock().filters.remove(filter_id.as_str()).is_some()
    }

    fn run_query(&self, query: &str, options: &Value) -> Result<Value, QueryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let predicate = Predicate::parse(query)?;
        let chain = self.chain.lock();

        let offset = match options["cursor"].as_str() {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| QueryError::Transport(format!("bad cursor {cursor}")))?,
            None => 0,
        };
        let page_size = options["resultsPerPage"].as_u64().unwrap_or(100) as usize;
        let block = options["atBlock"].as_u64().unwrap_or(chain.block);
        let include = &options["includeData"];

        let matches: Vec<&StoredEntity> = chain
            .entities
            .iter()
            .filter(|e| predicate.matches(e))
            .collect();
        let end = (offset + page_size).min(matches.len());
        let data: Vec<Value> = matches[offset.min(end)..end]
            .iter()
            .map(|e| render(e, include))
            .collect();
        let cursor = (end < matches.len()).then(|| end.to_string());

        Ok(json!({ "data": data, "blockNumber": block, "cursor": cursor }))
    }
}

// =============================================================================
// STATE TRANSITIONS
// =============================================================================

fn apply(
    current: &[StoredEntity],
    operations: &Operations,
    sender: Address,
    block: BlockNumber,
    tx_hash: TxHash,
) -> Option<(Vec<StoredEntity>, Vec<RpcLog>)> {
    let mut entities = current.to_vec();
    let mut logs = Vec::new();
    let emit = |kind: EventKind, key: EntityKey, owners: &[Address], words: &[U256]| {
        let mut topics = vec![topic_for(kind), H256(key.to_bytes())];
        topics.extend(owners.iter().map(|a| address_topic(*a)));
        RpcLog {
            address: STORAGE_ADDRESS,
            topics,
            data: Bytes(words.iter().flat_map(|w| word(*w)).collect()),
            block_number: Some(block),
            transaction_hash: Some(tx_hash),
            log_index: None,
            removed: false,
        }
    };

    for (index, op) in operations.creates().iter().enumerate() {
        let key = EntityKey::from_bytes(
            hash_words(&[tx_hash.as_bytes(), &(index as u64).to_be_bytes()]).0,
        );
        let expires_at = block + op.btl;
        logs.push(emit(
            EventKind::Created,
            key,
            &[sender],
            &[expires_at.into(), cost(&op.payload)],
        ));
        entities.push(StoredEntity {
            key,
            owner: sender,
            expires_at,
            payload: op.payload.clone(),
            content_type: op.content_type.clone(),
            attributes: op.attributes.clone(),
        });
    }

    for op in operations.updates() {
        let entity = entities.iter_mut().find(|e| e.key == op.entity_key)?;
        let old = entity.expires_at;
        entity.expires_at = block + op.btl;
        entity.payload = op.payload.clone();
        entity.content_type = op.content_type.clone();
        entity.attributes = op.attributes.clone();
        logs.push(emit(
            EventKind::Updated,
            entity.key,
            &[entity.owner],
            &[old.into(), entity.expires_at.into(), cost(&op.payload)],
        ));
    }

    for op in operations.deletes() {
        let index = entities.iter().position(|e| e.key == op.entity_key)?;
        let entity = entities.remove(index);
        logs.push(emit(EventKind::Deleted, entity.key, &[entity.owner], &[]));
    }

    for op in operations.extensions() {
        let entity = entities.iter_mut().find(|e| e.key == op.entity_key)?;
        let old = entity.expires_at;
        entity.expires_at = old + op.number_of_blocks;
        logs.push(emit(
            EventKind::Extended,
            entity.key,
            &[entity.owner],
            &[old.into(), entity.expires_at.into(), U256::from(op.number_of_blocks)],
        ));
    }

    for op in operations.change_owners() {
        let entity = entities.iter_mut().find(|e| e.key == op.entity_key)?;
        let old = entity.owner;
        entity.owner = op.new_owner;
        logs.push(emit(EventKind::OwnerChanged, entity.key, &[old, op.new_owner], &[]));
    }

    Some((entities, logs))
}

fn expire(chain: &mut Chain) {
    let block = chain.block;
    let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut chain.entities)
        .into_iter()
        .partition(|e| e.expires_at <= block);
    chain.entities = live;
    for entity in expired {
        chain.logs.push(RpcLog {
            address: STORAGE_ADDRESS,
            topics: vec![
                topic_for(EventKind::Expired),
                H256(entity.key.to_bytes()),
                address_topic(entity.owner),
            ],
            block_number: Some(block),
            ..Default::default()
        });
    }
}

fn cost(payload: &[u8]) -> U256 {
    U256::from(payload.len())
}

fn word(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}

fn address_topic(address: Address) -> H256 {
    let mut topic = [0u8; 32];
    topic[12..].copy_from_slice(address.as_bytes());
    H256(topic)
}

fn hash_words(parts: &[&[u8]]) -> H256 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    H256::from_slice(&hasher.finalize())
}

fn hex_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

// =============================================================================
// QUERIES
// =============================================================================

enum Predicate {
    All,
    Key(EntityKey),
    Owner(Address),
    Attribute(String, AttributeValue),
}

impl Predicate {
    fn parse(query: &str) -> Result<Self, QueryError> {
        let unsupported = || QueryError::Transport(format!("unsupported query: {query}"));
        let (lhs, rhs) = query.split_once('=').ok_or_else(unsupported)?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());

        Ok(match lhs {
            "1" if rhs == "1" => Predicate::All,
            "$key" => Predicate::Key(EntityKey::from_str(rhs).map_err(|_| unsupported())?),
            "$owner" => {
                let bytes = hex::decode(rhs.trim_start_matches("0x")).map_err(|_| unsupported())?;
                if bytes.len() != 20 {
                    return Err(unsupported());
                }
                Predicate::Owner(Address::from_slice(&bytes))
            }
            name => {
                let value = match rhs.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                    Some(text) => AttributeValue::from(text),
                    None => AttributeValue::from(rhs.parse::<u64>().map_err(|_| unsupported())?),
                };
                Predicate::Attribute(name.to_string(), value)
            }
        })
    }

    fn matches(&self, entity: &StoredEntity) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Key(key) => entity.key == *key,
            Predicate::Owner(owner) => entity.owner == *owner,
            Predicate::Attribute(name, value) => entity.attributes.get(name) == Some(value),
        }
    }
}

fn render(entity: &StoredEntity, include: &Value) -> Value {
    let wants = |flag: &str| include[flag].as_bool().unwrap_or(false);
    let mut item = json!({});

    if wants("key") {
        item["key"] = json!(entity.key.to_string());
    }
    if wants("owner") {
        item["owner"] = json!(hex_address(&entity.owner));
    }
    if wants("expiration") {
        item["expiresAt"] = json!(entity.expires_at);
    }
    if wants("payload") {
        item["value"] = json!(format!("0x{}", hex::encode(&entity.payload)));
    }
    if wants("contentType") {
        item["contentType"] = json!(entity.content_type);
    }
    if wants("annotations") {
        // Stored attributes were validated on the way in.
        let (strings, numerics) = split_attributes(&entity.attributes).unwrap_or_default();
        let (mut strings, numerics) = to_rpc_attributes(&strings, &numerics);
        strings.push(shared_types::RpcAttribute::new(
            "$owner",
            hex_address(&entity.owner),
        ));
        item["stringAnnotations"] = json!(strings);
        item["numericAnnotations"] = json!(numerics);
    }
    item
}

// =============================================================================
// PORTS
// =============================================================================

impl Transport for InMemoryNode {
    fn send_transaction(&self, tx: TxParams) -> Result<TxHash, TransportError> {
        self.submit(tx)
    }

    fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<RpcReceipt, TransportError> {
        self.receipt(tx_hash)
    }
}

#[async_trait]
impl AsyncTransport for InMemoryNode {
    async fn send_transaction(&self, tx: TxParams) -> Result<TxHash, TransportError> {
        self.submit(tx)
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<RpcReceipt, TransportError> {
        self.receipt(tx_hash)
    }
}

impl BlockingLogSource for InMemoryNode {
    fn create_filter(
        &self,
        kind: EventKind,
        from_block: BlockTag,
    ) -> Result<FilterId, LogSourceError> {
        Ok(self.create(kind, from_block))
    }

    fn get_new_entries(&self, filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError> {
        self.entries(filter_id)
    }

    fn uninstall_filter(&self, filter_id: &FilterId) -> Result<bool, LogSourceError> {
        Ok(self.uninstall(filter_id))
    }
}

#[async_trait]
impl LogSource for InMemoryNode {
    async fn create_filter(
        &self,
        kind: EventKind,
        from_block: BlockTag,
    ) -> Result<FilterId, LogSourceError> {
        Ok(self.create(kind, from_block))
    }

    async fn get_new_entries(&self, filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError> {
        self.entries(filter_id)
    }

    async fn uninstall_filter(&self, filter_id: &FilterId) -> Result<bool, LogSourceError> {
        Ok(self.uninstall(filter_id))
    }
}

impl QuerySource for InMemoryNode {
    fn query(&self, query: &str, options: &Value) -> Result<Value, QueryError> {
        self.run_query(query, options)
    }
}

#[async_trait]
impl AsyncQuerySource for InMemoryNode {
    async fn query(&self, query: &str, options: &Value) -> Result<Value, QueryError> {
        self.run_query(query, options)
    }
}
