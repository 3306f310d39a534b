//! Entity key conversions and validation.

use primitive_types::U256;
use shared_types::{EntityKey, EntityKeyError};
use tracing::debug;

/// Render an integer as a canonical entity key (`0x` + 64 hex digits).
pub fn to_entity_key(value: U256) -> EntityKey {
    EntityKey::from_u256(value)
}

/// Raw 32 big-endian bytes of a key, as placed on the wire.
pub fn entity_key_to_bytes(key: &EntityKey) -> [u8; 32] {
    key.to_bytes()
}

/// Validate a textual entity key.
///
/// `label` only prefixes the log line so that callers can tell which argument
/// was checked.
pub fn check_entity_key(value: &str, label: Option<&str>) -> Result<(), EntityKeyError> {
    match label {
        Some(label) => debug!(label, entity_key = value, "Checking entity key"),
        None => debug!(entity_key = value, "Checking entity key"),
    }
    EntityKey::validate(value)
}

/// Non-failing form of [`check_entity_key`].
pub fn is_entity_key(value: &str) -> bool {
    EntityKey::validate(value).is_ok()
}

/// True for a non-empty hex string with an optional `0x` prefix.
pub fn is_hex_str(value: &str) -> bool {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit())
}
