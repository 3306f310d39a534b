//! Wire-level storage transaction.
//!
//! Field order in every struct below is the layout the storage contract
//! decodes and must not change:
//!
//! ```text
//! [ creates, updates, deletes, extensions, change_owners ]
//! create       = [btl, content_type, payload, string_attrs, numeric_attrs]
//! update       = [key, content_type, btl, payload, string_attrs, numeric_attrs]
//! delete       = key
//! extend       = [key, number_of_blocks]
//! change_owner = [key, new_owner]
//! attr         = [name, value]
//! ```

use primitive_types::{H160, H256};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireAttribute<T> {
    pub key: String,
    pub value: T,
}

pub type WireStringAttribute = WireAttribute<String>;
pub type WireNumericAttribute = WireAttribute<u64>;

impl<T: Encodable> Encodable for WireAttribute<T> {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.key);
        s.append(&self.value);
    }
}

impl<T: Decodable> Decodable for WireAttribute<T> {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 2)?;
        Ok(Self {
            key: rlp.val_at(0)?,
            value: rlp.val_at(1)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireCreate {
    pub btl: u64,
    pub content_type: String,
    pub payload: Vec<u8>,
    pub string_attributes: Vec<WireStringAttribute>,
    pub numeric_attributes: Vec<WireNumericAttribute>,
}

impl Encodable for WireCreate {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(5);
        s.append(&self.btl);
        s.append(&self.content_type);
        s.append(&self.payload);
        append_items(s, &self.string_attributes);
        append_items(s, &self.numeric_attributes);
    }
}

impl Decodable for WireCreate {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 5)?;
        Ok(Self {
            btl: rlp.val_at(0)?,
            content_type: rlp.val_at(1)?,
            payload: rlp.val_at(2)?,
            string_attributes: decode_items(&rlp.at(3)?)?,
            numeric_attributes: decode_items(&rlp.at(4)?)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireUpdate {
    pub entity_key: H256,
    pub content_type: String,
    pub btl: u64,
    pub payload: Vec<u8>,
    pub string_attributes: Vec<WireStringAttribute>,
    pub numeric_attributes: Vec<WireNumericAttribute>,
}

impl Encodable for WireUpdate {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(6);
        s.append(&self.entity_key);
        s.append(&self.content_type);
        s.append(&self.btl);
        s.append(&self.payload);
        append_items(s, &self.string_attributes);
        append_items(s, &self.numeric_attributes);
    }
}

impl Decodable for WireUpdate {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 6)?;
        Ok(Self {
            entity_key: rlp.val_at(0)?,
            content_type: rlp.val_at(1)?,
            btl: rlp.val_at(2)?,
            payload: rlp.val_at(3)?,
            string_attributes: decode_items(&rlp.at(4)?)?,
            numeric_attributes: decode_items(&rlp.at(5)?)?,
        })
    }
}

/// Deletes are bare keys.
pub type WireDelete = H256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireExtend {
    pub entity_key: H256,
    pub number_of_blocks: u64,
}

impl Encodable for WireExtend {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.entity_key);
        s.append(&self.number_of_blocks);
    }
}

impl Decodable for WireExtend {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 2)?;
        Ok(Self {
            entity_key: rlp.val_at(0)?,
            number_of_blocks: rlp.val_at(1)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireChangeOwner {
    pub entity_key: H256,
    pub new_owner: H160,
}

impl Encodable for WireChangeOwner {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.entity_key);
        s.append(&self.new_owner);
    }
}

impl Decodable for WireChangeOwner {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 2)?;
        Ok(Self {
            entity_key: rlp.val_at(0)?,
            new_owner: rlp.val_at(1)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageTransaction {
    pub creates: Vec<WireCreate>,
    pub updates: Vec<WireUpdate>,
    pub deletes: Vec<WireDelete>,
    pub extensions: Vec<WireExtend>,
    pub change_owners: Vec<WireChangeOwner>,
}

impl Encodable for StorageTransaction {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(5);
        append_items(s, &self.creates);
        append_items(s, &self.updates);
        append_items(s, &self.deletes);
        append_items(s, &self.extensions);
        append_items(s, &self.change_owners);
    }
}

impl Decodable for StorageTransaction {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        expect_list(rlp, 5)?;
        Ok(Self {
            creates: decode_items(&rlp.at(0)?)?,
            updates: decode_items(&rlp.at(1)?)?,
            deletes: decode_items(&rlp.at(2)?)?,
            extensions: decode_items(&rlp.at(3)?)?,
            change_owners: decode_items(&rlp.at(4)?)?,
        })
    }
}

fn append_items<T: Encodable>(s: &mut RlpStream, items: &[T]) {
    s.begin_list(items.len());
    for item in items {
        s.append(item);
    }
}

fn decode_items<T: Decodable>(rlp: &Rlp) -> Result<Vec<T>, DecoderError> {
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList);
    }
    rlp.iter().map(|item| T::decode(&item)).collect()
}

fn expect_list(rlp: &Rlp, count: usize) -> Result<(), DecoderError> {
    if !rlp.is_list() {
        return Err(DecoderError::RlpExpectedToBeList);
    }
    if rlp.item_count()? != count {
        return Err(DecoderError::RlpIncorrectListLen);
    }
    Ok(())
}
