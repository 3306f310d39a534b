//! # Lifecycle Events
//!
//! Typed entity lifecycle events emitted by the storage contract, and the
//! per-transaction receipt that aggregates them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{Address, BlockNumber, EntityKey, TxHash, U256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub entity_key: EntityKey,
    pub owner_address: Address,
    pub expiration_block: BlockNumber,
    pub cost: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedEvent {
    pub entity_key: EntityKey,
    pub owner_address: Address,
    pub old_expiration_block: BlockNumber,
    pub new_expiration_block: BlockNumber,
    pub cost: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiredEvent {
    pub entity_key: EntityKey,
    pub owner_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedEvent {
    pub entity_key: EntityKey,
    pub owner_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedEvent {
    pub entity_key: EntityKey,
    pub owner_address: Address,
    pub old_expiration_block: BlockNumber,
    pub new_expiration_block: BlockNumber,
    pub cost: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerChangedEvent {
    pub entity_key: EntityKey,
    pub old_owner_address: Address,
    pub new_owner_address: Address,
}

/// One lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "event")]
pub enum Event {
    Created(CreatedEvent),
    Updated(UpdatedEvent),
    Expired(ExpiredEvent),
    Deleted(DeletedEvent),
    Extended(ExtendedEvent),
    OwnerChanged(OwnerChangedEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Created(_) => EventKind::Created,
            Event::Updated(_) => EventKind::Updated,
            Event::Expired(_) => EventKind::Expired,
            Event::Deleted(_) => EventKind::Deleted,
            Event::Extended(_) => EventKind::Extended,
            Event::OwnerChanged(_) => EventKind::OwnerChanged,
        }
    }

    pub fn entity_key(&self) -> EntityKey {
        match self {
            Event::Created(e) => e.entity_key,
            Event::Updated(e) => e.entity_key,
            Event::Expired(e) => e.entity_key,
            Event::Deleted(e) => e.entity_key,
            Event::Extended(e) => e.entity_key,
            Event::OwnerChanged(e) => e.entity_key,
        }
    }
}

/// Event discriminant, used to select what a filter watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Updated,
    Expired,
    Deleted,
    Extended,
    OwnerChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Created,
        EventKind::Updated,
        EventKind::Expired,
        EventKind::Deleted,
        EventKind::Extended,
        EventKind::OwnerChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Expired => "expired",
            EventKind::Deleted => "deleted",
            EventKind::Extended => "extended",
            EventKind::OwnerChanged => "owner_changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events produced by one transaction, bucketed by kind in log order.
///
/// Expiry is driven by the chain, not by a transaction, so it has no bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub block_number: BlockNumber,
    pub tx_hash: TxHash,
    pub creates: Vec<CreatedEvent>,
    pub updates: Vec<UpdatedEvent>,
    pub extensions: Vec<ExtendedEvent>,
    pub deletes: Vec<DeletedEvent>,
    pub change_owners: Vec<OwnerChangedEvent>,
}

impl TransactionReceipt {
    pub fn empty(block_number: BlockNumber, tx_hash: TxHash) -> Self {
        Self {
            block_number,
            tx_hash,
            creates: Vec::new(),
            updates: Vec::new(),
            extensions: Vec::new(),
            deletes: Vec::new(),
            change_owners: Vec::new(),
        }
    }

    /// Number of bucketed events.
    pub fn event_count(&self) -> usize {
        self.creates.len()
            + self.updates.len()
            + self.extensions.len()
            + self.deletes.len()
            + self.change_owners.len()
    }
}
