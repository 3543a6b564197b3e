//! FILENAME: core/report-engine/src/response.rs
//! Report Response - the `{columns, data}` body of the analytics endpoint.
//!
//! Parsing is best-effort on the node level: a missing `level` reads as 0,
//! nested objects and arrays other than `items` are dropped, and nothing in
//! a node can make parsing fail. Only a body that is not JSON at all (or a
//! column list of the wrong shape) is an error.

use std::collections::BTreeMap;

use engine::CellValue;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::definition::{ColumnDef, Level};
use crate::error::ReportError;

pub(crate) const LEVEL_KEY: &str = "level";
const ITEMS_KEY: &str = "items";

// ============================================================================
// NODE
// ============================================================================

/// One entry of the report tree (enterprise, group or line item).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    pub level: Level,

    /// Every scalar field of the record, keyed by column key.
    #[serde(flatten)]
    pub fields: BTreeMap<String, CellValue>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Node>,
}

impl Node {
    pub fn new(level: Level) -> Self {
        Node {
            level,
            ..Default::default()
        }
    }

    /// Builder used by fixtures: adds one field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder used by fixtures: appends children.
    pub fn with_items(mut self, items: Vec<Node>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        1 + self.items.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Builds a node from an arbitrary JSON value. Never fails.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Node::default();
        };

        let mut node = Node {
            level: object.get(LEVEL_KEY).map(parse_level).unwrap_or_default(),
            ..Default::default()
        };

        for (key, value) in object {
            match key.as_str() {
                LEVEL_KEY => {}
                ITEMS_KEY => {
                    if let Value::Array(children) = value {
                        node.items = children
                            .iter()
                            .filter(|child| child.is_object())
                            .map(Node::from_json)
                            .collect();
                    }
                }
                _ => {
                    if let Some(cell) = scalar_to_cell(value) {
                        node.fields.insert(key.clone(), cell);
                    }
                }
            }
        }

        node
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Node::from_json(&value))
    }
}

fn parse_level(value: &Value) -> Level {
    let depth = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Level::from_depth(depth)
}

fn scalar_to_cell(value: &Value) -> Option<CellValue> {
    match value {
        Value::Null => Some(CellValue::Empty),
        Value::Bool(b) => Some(CellValue::Boolean(*b)),
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::String(s) => Some(CellValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// The decoded endpoint body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportResponse {
    pub columns: Vec<ColumnDef>,
    pub data: Vec<Node>,
}

impl ReportResponse {
    /// Total number of nodes across the whole tree.
    pub fn node_count(&self) -> usize {
        self.data.iter().map(Node::subtree_len).sum()
    }
}

/// Decodes an endpoint body.
pub fn parse_report_response(json: &str) -> Result<ReportResponse, ReportError> {
    let response: ReportResponse =
        serde_json::from_str(json).map_err(ReportError::InvalidResponse)?;
    engine::log_debug!(
        "RESPONSE",
        "parsed columns={} nodes={}",
        response.columns.len(),
        response.node_count()
    );
    Ok(response)
}
