//! `Operations` ↔ storage transaction bytes.

use ak_01_entity_codec::{entity_key_to_bytes, split_attributes};
use primitive_types::H256;
use rlp::Rlp;
use shared_types::{
    Attributes, ChangeOwnerOp, CreateOp, DeleteOp, EntityKey, ExtendOp, Operations, UpdateOp,
};
use tracing::debug;

use super::wire::{
    StorageTransaction, WireAttribute, WireChangeOwner, WireCreate, WireExtend,
    WireNumericAttribute, WireStringAttribute, WireUpdate,
};
use crate::error::{EncodingError, Result};

/// Encode a batch into the storage contract's transaction payload.
///
/// Attribute errors abort the whole batch; no partial output is produced.
pub fn rlp_encode_transaction(operations: &Operations) -> Result<Vec<u8>> {
    let tx = to_storage_transaction(operations)?;
    let encoded = rlp::encode(&tx).to_vec();
    debug!(
        creates = tx.creates.len(),
        updates = tx.updates.len(),
        deletes = tx.deletes.len(),
        extensions = tx.extensions.len(),
        change_owners = tx.change_owners.len(),
        bytes = encoded.len(),
        "Encoded storage transaction"
    );
    Ok(encoded)
}

/// Decode a storage transaction payload back into typed operations.
pub fn rlp_decode_transaction(bytes: &[u8]) -> Result<Operations> {
    let tx: StorageTransaction = Rlp::new(bytes)
        .as_val()
        .map_err(EncodingError::rlp("storage transaction"))?;
    from_storage_transaction(tx)
}

pub fn to_storage_transaction(operations: &Operations) -> Result<StorageTransaction> {
    Ok(StorageTransaction {
        creates: operations
            .creates()
            .iter()
            .map(wire_create)
            .collect::<Result<_>>()?,
        updates: operations
            .updates()
            .iter()
            .map(wire_update)
            .collect::<Result<_>>()?,
        deletes: operations
            .deletes()
            .iter()
            .map(|op| wire_key(&op.entity_key))
            .collect(),
        extensions: operations
            .extensions()
            .iter()
            .map(|op| WireExtend {
                entity_key: wire_key(&op.entity_key),
                number_of_blocks: op.number_of_blocks,
            })
            .collect(),
        change_owners: operations
            .change_owners()
            .iter()
            .map(|op| WireChangeOwner {
                entity_key: wire_key(&op.entity_key),
                new_owner: op.new_owner,
            })
            .collect(),
    })
}

pub fn from_storage_transaction(tx: StorageTransaction) -> Result<Operations> {
    let creates = tx
        .creates
        .into_iter()
        .map(|c| CreateOp {
            payload: c.payload,
            content_type: c.content_type,
            attributes: attributes_from_wire(c.string_attributes, c.numeric_attributes),
            btl: c.btl,
        })
        .collect();
    let updates = tx
        .updates
        .into_iter()
        .map(|u| UpdateOp {
            entity_key: EntityKey::from_bytes(u.entity_key.0),
            payload: u.payload,
            content_type: u.content_type,
            attributes: attributes_from_wire(u.string_attributes, u.numeric_attributes),
            btl: u.btl,
        })
        .collect();
    let deletes = tx
        .deletes
        .into_iter()
        .map(|key| DeleteOp {
            entity_key: EntityKey::from_bytes(key.0),
        })
        .collect();
    let extensions = tx
        .extensions
        .into_iter()
        .map(|e| ExtendOp {
            entity_key: EntityKey::from_bytes(e.entity_key.0),
            number_of_blocks: e.number_of_blocks,
        })
        .collect();
    let change_owners = tx
        .change_owners
        .into_iter()
        .map(|c| ChangeOwnerOp {
            entity_key: EntityKey::from_bytes(c.entity_key.0),
            new_owner: c.new_owner,
        })
        .collect();

    Ok(Operations::new(
        creates,
        updates,
        deletes,
        extensions,
        change_owners,
    )?)
}

fn wire_key(key: &EntityKey) -> H256 {
    H256(entity_key_to_bytes(key))
}

fn wire_create(op: &CreateOp) -> Result<WireCreate> {
    let (string_attributes, numeric_attributes) = wire_attributes(&op.attributes)?;
    Ok(WireCreate {
        btl: op.btl,
        content_type: op.content_type.clone(),
        payload: op.payload.clone(),
        string_attributes,
        numeric_attributes,
    })
}

fn wire_update(op: &UpdateOp) -> Result<WireUpdate> {
    let (string_attributes, numeric_attributes) = wire_attributes(&op.attributes)?;
    Ok(WireUpdate {
        entity_key: wire_key(&op.entity_key),
        content_type: op.content_type.clone(),
        btl: op.btl,
        payload: op.payload.clone(),
        string_attributes,
        numeric_attributes,
    })
}

fn wire_attributes(
    attributes: &Attributes,
) -> Result<(Vec<WireStringAttribute>, Vec<WireNumericAttribute>)> {
    let (strings, numerics) = split_attributes(attributes)?;
    Ok((
        strings
            .into_iter()
            .map(|(key, value)| WireAttribute { key, value })
            .collect(),
        numerics
            .into_iter()
            .map(|(key, value)| WireAttribute { key, value })
            .collect(),
    ))
}

// String pairs first, then numeric pairs, matching how the lists were split.
fn attributes_from_wire(
    strings: Vec<WireStringAttribute>,
    numerics: Vec<WireNumericAttribute>,
) -> Attributes {
    let mut attributes = Attributes::new();
    for a in strings {
        attributes.insert(a.key, a.value);
    }
    for a in numerics {
        attributes.insert(a.key, a.value);
    }
    attributes
}
