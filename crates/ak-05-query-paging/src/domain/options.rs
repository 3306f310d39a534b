//! Query options and their JSON-RPC shape.

use serde_json::{json, Value};
use shared_types::{BlockNumber, Cursor, Fields};

use crate::error::{QueryError, Result};

pub const DEFAULT_RESULTS_PER_PAGE: usize = 100;

/// Match-all condition used when a query has no `WHERE`.
pub const MATCH_ALL: &str = "1 = 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Int,
    Str,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Int => "int",
            OrderKind::Str => "str",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Sort key for query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub attribute: String,
    pub kind: OrderKind,
    pub direction: Direction,
}

impl OrderBy {
    /// Sort by a numeric attribute, ascending.
    pub fn int(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            kind: OrderKind::Int,
            direction: Direction::Asc,
        }
    }

    /// Sort by a string attribute, ascending.
    pub fn str(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            kind: OrderKind::Str,
            direction: Direction::Asc,
        }
    }

    pub fn asc(mut self) -> Self {
        self.direction = Direction::Asc;
        self
    }

    pub fn desc(mut self) -> Self {
        self.direction = Direction::Desc;
        self
    }

    fn to_json(&self) -> Value {
        json!({
            "name": self.attribute,
            "type": self.kind.as_str(),
            "desc": self.direction == Direction::Desc,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub fields: Fields,
    pub max_results_per_page: usize,
    /// `None` queries the latest block.
    pub at_block: Option<BlockNumber>,
    pub cursor: Option<Cursor>,
    pub order_by: Vec<OrderBy>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            fields: Fields::ALL,
            max_results_per_page: DEFAULT_RESULTS_PER_PAGE,
            at_block: None,
            cursor: None,
            order_by: Vec::new(),
        }
    }
}

impl QueryOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.fields.is_known() {
            return Err(QueryError::InvalidFields {
                bits: self.fields.bits(),
            });
        }
        if self.max_results_per_page == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        Ok(())
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_page_size(mut self, max_results_per_page: usize) -> Self {
        self.max_results_per_page = max_results_per_page;
        self
    }

    pub fn with_at_block(mut self, at_block: BlockNumber) -> Self {
        self.at_block = Some(at_block);
        self
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

/// The `options` argument of the node's query method.
pub fn to_rpc_query_options(options: &QueryOptions) -> Value {
    let fields = options.fields;
    let mut rpc = json!({
        "atBlock": options.at_block,
        "includeData": {
            "key": fields.contains(Fields::KEY),
            "annotations": fields.contains(Fields::ATTRIBUTES),
            "payload": fields.contains(Fields::PAYLOAD),
            "contentType": fields.contains(Fields::CONTENT_TYPE),
            "expiration": fields.contains(Fields::EXPIRATION),
            "owner": fields.contains(Fields::OWNER),
        },
        "resultsPerPage": options.max_results_per_page,
        "cursor": options.cursor.as_ref().map(Cursor::as_str),
    });

    if !options.order_by.is_empty() {
        rpc["orderBy"] = options.order_by.iter().map(OrderBy::to_json).collect();
    }
    rpc
}
