//! # JSON-RPC Wire Types
//!
//! Shapes exchanged with an Ethereum-compatible node, following JSON-RPC
//! conventions: camelCase keys, `0x`-prefixed hex quantities and byte strings.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::entities::{Address, BlockNumber, TxHash, H256, U256};

/// Bytes wrapper with `0x` hex serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Bytes(Vec::new())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Bytes(v.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(s)
            .map(Bytes)
            .map_err(|_| de::Error::custom("invalid hex bytes"))
    }
}

/// Serde helpers for `u64` quantities encoded as `0x` hex (numbers accepted).
pub mod quantity {
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{:x}", value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QuantityVisitor)
    }

    struct QuantityVisitor;

    impl<'de> de::Visitor<'de> for QuantityVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a hex quantity starting with 0x or a number")
        }

        fn visit_str<E>(self, value: &str) -> Result<u64, E>
        where
            E: de::Error,
        {
            match value.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16)
                    .map_err(|_| de::Error::custom("invalid hex quantity")),
                None => value
                    .parse::<u64>()
                    .map_err(|_| de::Error::custom("invalid decimal quantity")),
            }
        }

        fn visit_u64<E>(self, value: u64) -> Result<u64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }
    }

    /// `Option<u64>` variant; `null` and missing both map to `None`.
    pub mod opt {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            #[derive(Deserialize)]
            struct Wrapper(#[serde(with = "super")] u64);

            let v = Option::<Wrapper>::deserialize(deserializer)?;
            Ok(v.map(|Wrapper(n)| n))
        }
    }
}

/// Block selector: a tag or an explicit height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTag {
    #[default]
    Latest,
    Earliest,
    Pending,
    Number(BlockNumber),
}

impl BlockTag {
    pub fn number(&self) -> Option<BlockNumber> {
        match self {
            BlockTag::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<BlockNumber> for BlockTag {
    fn from(n: BlockNumber) -> Self {
        BlockTag::Number(n)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Earliest => f.write_str("earliest"),
            BlockTag::Pending => f.write_str("pending"),
            BlockTag::Number(n) => write!(f, "0x{:x}", n),
        }
    }
}

impl FromStr for BlockTag {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            "pending" => Ok(BlockTag::Pending),
            other => match other.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16)
                    .map(BlockTag::Number)
                    .map_err(|_| "invalid block number"),
                None => other
                    .parse::<u64>()
                    .map(BlockTag::Number)
                    .map_err(|_| "invalid block tag"),
            },
        }
    }
}

impl Serialize for BlockTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BlockTag::from_str(&s).map_err(de::Error::custom)
    }
}

/// Log entry as returned in receipts and by `eth_getFilterChanges`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    /// Contract address that emitted the log
    pub address: Address,
    /// Indexed topics (up to 4)
    pub topics: Vec<H256>,
    pub data: Bytes,
    #[serde(default, with = "quantity::opt", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<BlockNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TxHash>,
    #[serde(default, with = "quantity::opt", skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
    /// Whether this log was removed due to chain reorg
    #[serde(default)]
    pub removed: bool,
}

/// Subset of `eth_getTransactionReceipt` the client relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: TxHash,
    /// Missing for receipts of pending transactions.
    #[serde(default, with = "quantity::opt", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<BlockNumber>,
    /// 1 = success, 0 = reverted.
    #[serde(default, with = "quantity::opt", skip_serializing_if = "Option::is_none")]
    pub status: Option<u64>,
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

impl RpcReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == Some(1)
    }
}

/// Transaction parameters for `eth_sendTransaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
}

/// Attribute record as returned by the query RPC: `{"key": .., "value": ..}`.
///
/// The value is kept untyped so that wrong-type records can be detected and
/// skipped rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcAttribute {
    pub key: String,
    pub value: serde_json::Value,
}

impl RpcAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
