//! JSON query responses → [`QueryResult`].

use std::str::FromStr;

use ak_01_entity_codec::merge_attributes;
use serde_json::{Map, Value};
use shared_types::{
    Address, BlockNumber, Cursor, Entity, EntityKey, Fields, QueryResult, RpcAttribute,
};
use tracing::debug;

use crate::error::{QueryError, Result};

/// Parse one page of results.
///
/// `data` and `blockNumber` are required; `cursor` is optional.
pub fn to_query_result(fields: Fields, response: &Value) -> Result<QueryResult> {
    let response = response
        .as_object()
        .ok_or_else(|| QueryError::invalid("response", "expected an object"))?;

    let data = response
        .get("data")
        .ok_or(QueryError::MissingField { field: "data" })?
        .as_array()
        .ok_or_else(|| QueryError::invalid("data", "expected an array"))?;

    let entities = data
        .iter()
        .map(|item| to_entity(fields, item))
        .collect::<Result<Vec<_>>>()?;

    let block_number = response
        .get("blockNumber")
        .ok_or(QueryError::MissingField {
            field: "blockNumber",
        })
        .and_then(|v| quantity("blockNumber", v))?;

    let cursor = match response.get("cursor") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(Cursor::new(s.clone())),
        Some(other) => Some(Cursor::new(other.to_string())),
    };

    debug!(
        entities = entities.len(),
        block_number,
        has_cursor = cursor.is_some(),
        "Parsed query page"
    );

    Ok(QueryResult {
        entities,
        block_number,
        cursor,
    })
}

/// Parse one result item, populating only the fields in `fields`.
pub fn to_entity(fields: Fields, item: &Value) -> Result<Entity> {
    let item = item
        .as_object()
        .ok_or_else(|| QueryError::invalid("data", "expected an array of objects"))?;

    let mut entity = Entity {
        fields,
        ..Default::default()
    };

    if fields.contains(Fields::KEY) {
        let key = required_str(item, "key")?;
        entity.key = Some(EntityKey::from_str(key).map_err(|e| QueryError::invalid("key", e))?);
    }

    if fields.contains(Fields::OWNER) {
        let owner = required_str(item, "owner")?;
        entity.owner = Some(parse_address(owner)?);
    }

    if fields.contains(Fields::EXPIRATION) {
        let value = item
            .get("expiresAt")
            .ok_or(QueryError::MissingField { field: "expiresAt" })?;
        entity.expires_at_block = Some(quantity("expiresAt", value)?);
    }

    if fields.contains(Fields::PAYLOAD) {
        entity.payload = Some(match item.get("value") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) => {
                hex::decode(s.trim_start_matches("0x")).map_err(|e| QueryError::invalid("value", e))?
            }
            Some(_) => return Err(QueryError::invalid("value", "expected a hex string")),
        });
    }

    if fields.contains(Fields::CONTENT_TYPE) {
        entity.content_type = Some(required_str(item, "contentType")?.to_string());
    }

    if fields.contains(Fields::ATTRIBUTES) {
        let strings = attribute_list(item, "stringAnnotations")?;
        let numerics = attribute_list(item, "numericAnnotations")?;
        entity.attributes = Some(merge_attributes(strings.as_deref(), numerics.as_deref()));
    }

    Ok(entity)
}

fn required_str<'a>(item: &'a Map<String, Value>, field: &'static str) -> Result<&'a str> {
    item.get(field)
        .ok_or(QueryError::MissingField { field })?
        .as_str()
        .ok_or_else(|| QueryError::invalid(field, "expected a string"))
}

fn parse_address(value: &str) -> Result<Address> {
    let bytes = hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| QueryError::invalid("owner", e))?;
    if bytes.len() != 20 {
        return Err(QueryError::invalid(
            "owner",
            format!("expected 20 bytes, got {}", bytes.len()),
        ));
    }
    Ok(Address::from_slice(&bytes))
}

/// A block height sent either as a JSON number or a `0x` quantity.
fn quantity(field: &'static str, value: &Value) -> Result<BlockNumber> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| QueryError::invalid(field, "expected an unsigned integer")),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => s.parse::<u64>(),
        }
        .map_err(|e| QueryError::invalid(field, e)),
        _ => Err(QueryError::invalid(field, "expected a number")),
    }
}

fn attribute_list(
    item: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<RpcAttribute>>> {
    match item.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| QueryError::invalid(field, e)),
    }
}
