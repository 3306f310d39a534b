//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `EntityKey`, `Address`, `TxHash`
//! - **Attributes**: `AttributeValue`, `Attributes`
//! - **Query**: `Entity`, `Fields`, `Cursor`, `QueryResult`

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use crate::errors::EntityKeyError;

// Re-export primitive types for use across all crates
pub use primitive_types::{H160 as Address, H256, H256 as TxHash, U256};

/// Block height.
pub type BlockNumber = u64;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Length of the canonical `0x`-prefixed hex form.
pub const ENTITY_KEY_HEX_LEN: usize = 66;

/// 32-byte entity identifier.
///
/// Canonical text form is `0x` followed by 64 lowercase hex digits. Equality
/// is byte-wise, so keys parsed from upper- and lower-case hex compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct EntityKey([u8; 32]);

impl EntityKey {
    /// Wrap raw big-endian bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        EntityKey(bytes)
    }

    /// Raw big-endian bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn from_u256(value: U256) -> Self {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        EntityKey(bytes)
    }

    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    /// Check that `value` is `0x` + 64 hex digits without allocating a key.
    pub fn validate(value: &str) -> Result<(), EntityKeyError> {
        if value.is_empty() {
            return Err(EntityKeyError::Missing);
        }
        if value.len() != ENTITY_KEY_HEX_LEN {
            return Err(EntityKeyError::InvalidLength { len: value.len() });
        }
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| EntityKeyError::InvalidHex(value.to_string()))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EntityKeyError::InvalidHex(value.to_string()));
        }
        Ok(())
    }
}

impl FromStr for EntityKey {
    type Err = EntityKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&s[2..], &mut bytes)
            .map_err(|_| EntityKeyError::InvalidHex(s.to_string()))?;
        Ok(EntityKey(bytes))
    }
}

impl From<[u8; 32]> for EntityKey {
    fn from(bytes: [u8; 32]) -> Self {
        EntityKey(bytes)
    }
}

impl From<U256> for EntityKey {
    fn from(value: U256) -> Self {
        EntityKey::from_u256(value)
    }
}

impl From<u64> for EntityKey {
    fn from(value: u64) -> Self {
        EntityKey::from_u256(U256::from(value))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityKey({})", self)
    }
}

impl Serialize for EntityKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EntityKey::from_str(&s).map_err(de::Error::custom)
    }
}

// =============================================================================
// CLUSTER B: ATTRIBUTES
// =============================================================================

/// Reserved prefix for system-managed attributes (`$owner`, `$key`, ...).
pub const SYSTEM_ATTRIBUTE_PREFIX: &str = "$";

/// Attribute value: a string or an integer.
///
/// Numeric values are signed here so that a negative input survives until
/// encoding, where it is rejected rather than clamped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    String(String),
    Numeric(i128),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::Numeric(_) => None,
        }
    }

    pub fn as_numeric(&self) -> Option<i128> {
        match self {
            AttributeValue::Numeric(n) => Some(*n),
            AttributeValue::String(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{:?}", s),
            AttributeValue::Numeric(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        AttributeValue::Numeric(v as i128)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::Numeric(v as i128)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Numeric(v as i128)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Numeric(v as i128)
    }
}

/// Insertion-ordered attribute map.
///
/// Re-inserting a key replaces the value in place. Order is significant on
/// the wire and is never sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, AttributeValue)>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl IntoIterator for Attributes {
    type Item = (String, AttributeValue);
    type IntoIter = std::vec::IntoIter<(String, AttributeValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// CLUSTER C: QUERY
// =============================================================================

/// Bitmask selecting which entity fields a query populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(u32);

impl Fields {
    pub const NONE: Fields = Fields(0);
    pub const KEY: Fields = Fields(1);
    pub const ATTRIBUTES: Fields = Fields(1 << 1);
    pub const PAYLOAD: Fields = Fields(1 << 2);
    pub const CONTENT_TYPE: Fields = Fields(1 << 3);
    pub const EXPIRATION: Fields = Fields(1 << 4);
    pub const OWNER: Fields = Fields(1 << 5);
    pub const ALL: Fields = Fields(0b11_1111);

    pub const fn from_bits(bits: u32) -> Self {
        Fields(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Fields) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no bits outside [`Fields::ALL`] are set.
    pub const fn is_known(self) -> bool {
        self.0 & !Self::ALL.0 == 0
    }
}

impl Default for Fields {
    fn default() -> Self {
        Fields::ALL
    }
}

impl BitOr for Fields {
    type Output = Fields;

    fn bitor(self, rhs: Fields) -> Fields {
        Fields(self.0 | rhs.0)
    }
}

impl BitOrAssign for Fields {
    fn bitor_assign(&mut self, rhs: Fields) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Fields {
    type Output = Fields;

    fn bitand(self, rhs: Fields) -> Fields {
        Fields(self.0 & rhs.0)
    }
}

/// An entity as returned by a query. Only the requested `fields` are populated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entity {
    pub key: Option<EntityKey>,
    pub fields: Fields,
    pub owner: Option<Address>,
    pub expires_at_block: Option<BlockNumber>,
    pub payload: Option<Vec<u8>>,
    pub content_type: Option<String>,
    pub attributes: Option<Attributes>,
}

/// Opaque continuation token. Carries the pinned block height server-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Cursor(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub entities: Vec<Entity>,
    pub block_number: BlockNumber,
    pub cursor: Option<Cursor>,
}

impl QueryResult {
    /// True if another page can be requested.
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
