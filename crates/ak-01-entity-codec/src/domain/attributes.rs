//! Attribute split/merge.
//!
//! On the wire an entity carries two ordered pair lists, one for string
//! values and one for numeric values. [`split_attributes`] produces them from
//! an [`Attributes`] map; [`merge_attributes`] folds query results back.

use shared_types::{AttributeError, AttributeValue, Attributes, RpcAttribute, SYSTEM_ATTRIBUTE_PREFIX};
use tracing::{debug, warn};

/// `(key, value)` pairs with string values, in insertion order.
pub type StringAttributes = Vec<(String, String)>;

/// `(key, value)` pairs with numeric values, in insertion order.
pub type NumericAttributes = Vec<(String, u64)>;

/// Partition attributes into string and numeric lists.
///
/// Fails on the first numeric value that is negative or does not fit in u64.
pub fn split_attributes(
    attributes: &Attributes,
) -> Result<(StringAttributes, NumericAttributes), AttributeError> {
    let mut strings = StringAttributes::new();
    let mut numerics = NumericAttributes::new();

    for (key, value) in attributes.iter() {
        if key.is_empty() {
            return Err(AttributeError::EmptyKey);
        }
        match value {
            AttributeValue::String(s) => strings.push((key.to_string(), s.clone())),
            AttributeValue::Numeric(n) => {
                if *n < 0 {
                    return Err(AttributeError::NegativeValue {
                        key: key.to_string(),
                        value: *n,
                    });
                }
                let n = u64::try_from(*n).map_err(|_| AttributeError::ValueOutOfRange {
                    key: key.to_string(),
                    value: *n,
                })?;
                numerics.push((key.to_string(), n));
            }
        }
    }

    debug!(
        strings = strings.len(),
        numerics = numerics.len(),
        "Split attributes"
    );
    Ok((strings, numerics))
}

/// Merge query-result attribute lists back into one map.
///
/// System attributes (keys starting with `$`) are dropped. Records whose value
/// has the wrong type for their list are skipped with a warning.
pub fn merge_attributes(
    string_attributes: Option<&[RpcAttribute]>,
    numeric_attributes: Option<&[RpcAttribute]>,
) -> Attributes {
    let mut attributes = Attributes::new();

    for element in string_attributes.unwrap_or_default() {
        if element.key.starts_with(SYSTEM_ATTRIBUTE_PREFIX) {
            continue;
        }
        match element.value.as_str() {
            Some(s) => {
                attributes.insert(element.key.clone(), s);
            }
            None => warn!(
                key = %element.key,
                value = %element.value,
                "Unexpected string attribute, expected (str, str), skipping"
            ),
        }
    }

    for element in numeric_attributes.unwrap_or_default() {
        if element.key.starts_with(SYSTEM_ATTRIBUTE_PREFIX) {
            continue;
        }
        match element.value.as_u64() {
            Some(n) => {
                attributes.insert(element.key.clone(), n);
            }
            None => warn!(
                key = %element.key,
                value = %element.value,
                "Unexpected numeric attribute, expected (str, uint), skipping"
            ),
        }
    }

    attributes
}

/// Pair lists to the RPC record shape. Inverse view used by tests and mocks.
pub fn to_rpc_attributes(
    strings: &StringAttributes,
    numerics: &NumericAttributes,
) -> (Vec<RpcAttribute>, Vec<RpcAttribute>) {
    (
        strings
            .iter()
            .map(|(k, v)| RpcAttribute::new(k.clone(), v.clone()))
            .collect(),
        numerics
            .iter()
            .map(|(k, v)| RpcAttribute::new(k.clone(), *v))
            .collect(),
    )
}
