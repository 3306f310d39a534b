//! Single-entity lookups on top of the query RPC.

use shared_types::{Entity, EntityKey, QueryResult};

use crate::error::{ClientError, Result};

pub fn key_query(key: &EntityKey) -> String {
    format!("$key = {key}")
}

/// Exactly one row, or `EntityNotFound`.
pub fn single_entity(key: EntityKey, mut page: QueryResult) -> Result<Entity> {
    if page.entities.len() != 1 {
        return Err(ClientError::EntityNotFound { key });
    }
    Ok(page.entities.remove(0))
}
