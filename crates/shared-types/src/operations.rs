//! # Entity Operations
//!
//! Typed operations submitted to the storage contract in one transaction.
//! An [`Operations`] batch is never empty: both constructors reject a batch
//! without at least one operation.

use crate::entities::{Address, Attributes, EntityKey};
use crate::errors::OperationsError;

/// Create a new entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOp {
    pub payload: Vec<u8>,
    pub content_type: String,
    pub attributes: Attributes,
    /// Blocks to live.
    pub btl: u64,
}

/// Replace payload, content type, attributes and lifetime of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOp {
    pub entity_key: EntityKey,
    pub payload: Vec<u8>,
    pub content_type: String,
    pub attributes: Attributes,
    pub btl: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOp {
    pub entity_key: EntityKey,
}

/// Extend an entity's lifetime by `number_of_blocks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendOp {
    pub entity_key: EntityKey,
    pub number_of_blocks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeOwnerOp {
    pub entity_key: EntityKey,
    pub new_owner: Address,
}

/// A non-empty batch of operations, encoded into a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operations {
    creates: Vec<CreateOp>,
    updates: Vec<UpdateOp>,
    deletes: Vec<DeleteOp>,
    extensions: Vec<ExtendOp>,
    change_owners: Vec<ChangeOwnerOp>,
}

impl Operations {
    pub fn new(
        creates: Vec<CreateOp>,
        updates: Vec<UpdateOp>,
        deletes: Vec<DeleteOp>,
        extensions: Vec<ExtendOp>,
        change_owners: Vec<ChangeOwnerOp>,
    ) -> Result<Self, OperationsError> {
        if creates.is_empty()
            && updates.is_empty()
            && deletes.is_empty()
            && extensions.is_empty()
            && change_owners.is_empty()
        {
            return Err(OperationsError::Empty);
        }
        Ok(Self {
            creates,
            updates,
            deletes,
            extensions,
            change_owners,
        })
    }

    pub fn builder() -> OperationsBuilder {
        OperationsBuilder::default()
    }

    pub fn from_create(op: CreateOp) -> Self {
        Self::single(|b| b.create(op))
    }

    pub fn from_update(op: UpdateOp) -> Self {
        Self::single(|b| b.update(op))
    }

    pub fn from_delete(op: DeleteOp) -> Self {
        Self::single(|b| b.delete(op))
    }

    pub fn from_extend(op: ExtendOp) -> Self {
        Self::single(|b| b.extend(op))
    }

    pub fn from_change_owner(op: ChangeOwnerOp) -> Self {
        Self::single(|b| b.change_owner(op))
    }

    // Exactly one op was pushed, so the batch is non-empty.
    fn single(push: impl FnOnce(OperationsBuilder) -> OperationsBuilder) -> Self {
        let b = push(OperationsBuilder::default());
        Self {
            creates: b.creates,
            updates: b.updates,
            deletes: b.deletes,
            extensions: b.extensions,
            change_owners: b.change_owners,
        }
    }

    pub fn creates(&self) -> &[CreateOp] {
        &self.creates
    }

    pub fn updates(&self) -> &[UpdateOp] {
        &self.updates
    }

    pub fn deletes(&self) -> &[DeleteOp] {
        &self.deletes
    }

    pub fn extensions(&self) -> &[ExtendOp] {
        &self.extensions
    }

    pub fn change_owners(&self) -> &[ChangeOwnerOp] {
        &self.change_owners
    }

    /// Total number of operations across all variants.
    pub fn len(&self) -> usize {
        self.creates.len()
            + self.updates.len()
            + self.deletes.len()
            + self.extensions.len()
            + self.change_owners.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accumulates operations; [`OperationsBuilder::build`] enforces non-emptiness.
#[derive(Debug, Clone, Default)]
pub struct OperationsBuilder {
    creates: Vec<CreateOp>,
    updates: Vec<UpdateOp>,
    deletes: Vec<DeleteOp>,
    extensions: Vec<ExtendOp>,
    change_owners: Vec<ChangeOwnerOp>,
}

impl OperationsBuilder {
    pub fn create(mut self, op: CreateOp) -> Self {
        self.creates.push(op);
        self
    }

    pub fn update(mut self, op: UpdateOp) -> Self {
        self.updates.push(op);
        self
    }

    pub fn delete(mut self, op: DeleteOp) -> Self {
        self.deletes.push(op);
        self
    }

    pub fn extend(mut self, op: ExtendOp) -> Self {
        self.extensions.push(op);
        self
    }

    pub fn change_owner(mut self, op: ChangeOwnerOp) -> Self {
        self.change_owners.push(op);
        self
    }

    pub fn build(self) -> Result<Operations, OperationsError> {
        Operations::new(
            self.creates,
            self.updates,
            self.deletes,
            self.extensions,
            self.change_owners,
        )
    }
}
