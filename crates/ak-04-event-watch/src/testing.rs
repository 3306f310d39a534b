//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use ak_03_event_decoding::topic_for;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Address, BlockTag, Bytes, EntityKey, EventKind, RpcLog, TxHash, H256, U256};

use crate::error::LogSourceError;
use crate::ports::{BlockingLogSource, FilterId, LogSource};

/// Scripted log source. Each poll pops one batch; an empty queue yields
/// no logs.
#[derive(Default)]
pub struct MockLogSource {
    batches: Mutex<VecDeque<Result<Vec<RpcLog>, LogSourceError>>>,
    pub created: Mutex<Vec<(EventKind, BlockTag)>>,
    pub uninstalled: Mutex<Vec<FilterId>>,
    pub polls: AtomicUsize,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batch(&self, logs: Vec<RpcLog>) {
        self.batches.lock().push_back(Ok(logs));
    }

    pub fn push_error(&self, error: LogSourceError) {
        self.batches.lock().push_back(Err(error));
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    fn create(&self, kind: EventKind, from_block: BlockTag) -> FilterId {
        let mut created = self.created.lock();
        created.push((kind, from_block));
        FilterId::new(format!("0x{:x}", created.len()))
    }

    fn next_batch(&self) -> Result<Vec<RpcLog>, LogSourceError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().pop_front().unwrap_or(Ok(Vec::new()))
    }

    fn uninstall(&self, filter_id: &FilterId) -> bool {
        self.uninstalled.lock().push(filter_id.clone());
        true
    }
}

impl BlockingLogSource for MockLogSource {
    fn create_filter(
        &self,
        kind: EventKind,
        from_block: BlockTag,
    ) -> Result<FilterId, LogSourceError> {
        Ok(self.create(kind, from_block))
    }

    fn get_new_entries(&self, _filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError> {
        self.next_batch()
    }

    fn uninstall_filter(&self, filter_id: &FilterId) -> Result<bool, LogSourceError> {
        Ok(self.uninstall(filter_id))
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn create_filter(
        &self,
        kind: EventKind,
        from_block: BlockTag,
    ) -> Result<FilterId, LogSourceError> {
        Ok(self.create(kind, from_block))
    }

    async fn get_new_entries(&self, _filter_id: &FilterId) -> Result<Vec<RpcLog>, LogSourceError> {
        self.next_batch()
    }

    async fn uninstall_filter(&self, filter_id: &FilterId) -> Result<bool, LogSourceError> {
        Ok(self.uninstall(filter_id))
    }
}

fn word(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    U256::from(value).to_big_endian(&mut out);
    out
}

fn owner_topic() -> H256 {
    let mut topic = [0u8; 32];
    topic[12..].copy_from_slice(Address::repeat_byte(0xab).as_bytes());
    H256(topic)
}

/// `ArkivEntityCreated` log for entity `key`.
pub fn created_log(key: u64, tx: u8) -> RpcLog {
    RpcLog {
        topics: vec![
            topic_for(EventKind::Created),
            H256(EntityKey::from(key).to_bytes()),
            owner_topic(),
        ],
        data: Bytes([word(1_000), word(1)].concat()),
        transaction_hash: Some(TxHash::repeat_byte(tx)),
        ..Default::default()
    }
}

/// `ArkivEntityDeleted` log for entity `key`.
pub fn deleted_log(key: u64) -> RpcLog {
    RpcLog {
        topics: vec![
            topic_for(EventKind::Deleted),
            H256(EntityKey::from(key).to_bytes()),
            owner_topic(),
        ],
        transaction_hash: Some(TxHash::repeat_byte(0xdd)),
        ..Default::default()
    }
}

/// Spin until `cond` holds or two seconds pass.
pub fn wait_until(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

/// Async variant of [`wait_until`].
pub async fn wait_until_async(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
