//! Defaults applied when building create/update operations.

use shared_types::{Attributes, CreateOp, EntityKey, UpdateOp};

/// Default blocks-to-live for new entities (~30 minutes at 2s blocks).
pub const BTL_DEFAULT: u64 = 1000;

pub const CONTENT_TYPE_DEFAULT: &str = "application/octet-stream";

/// Fill unset create/update arguments with their defaults.
///
/// An empty content type counts as unset.
pub fn check_and_set_entity_op_defaults(
    payload: Option<Vec<u8>>,
    content_type: Option<String>,
    attributes: Option<Attributes>,
    btl: Option<u64>,
) -> (Vec<u8>, String, Attributes, u64) {
    let content_type = content_type
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| CONTENT_TYPE_DEFAULT.to_string());
    (
        payload.unwrap_or_default(),
        content_type,
        attributes.unwrap_or_default(),
        btl.unwrap_or(BTL_DEFAULT),
    )
}

pub fn to_create_op(
    payload: Option<Vec<u8>>,
    content_type: Option<String>,
    attributes: Option<Attributes>,
    btl: Option<u64>,
) -> CreateOp {
    let (payload, content_type, attributes, btl) =
        check_and_set_entity_op_defaults(payload, content_type, attributes, btl);
    CreateOp {
        payload,
        content_type,
        attributes,
        btl,
    }
}

pub fn to_update_op(
    entity_key: EntityKey,
    payload: Option<Vec<u8>>,
    content_type: Option<String>,
    attributes: Option<Attributes>,
    btl: Option<u64>,
) -> UpdateOp {
    let (payload, content_type, attributes, btl) =
        check_and_set_entity_op_defaults(payload, content_type, attributes, btl);
    UpdateOp {
        entity_key,
        payload,
        content_type,
        attributes,
        btl,
    }
}
