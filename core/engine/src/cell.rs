//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the tagged value held by a single report cell.
//! CONTEXT: Report rows arrive as open string-keyed records whose values are
//! strings, numbers or nulls. `CellValue` closes that set so formatting,
//! filtering and sorting can match exhaustively.

use serde::{Deserialize, Serialize};

use crate::number_format::{format_number, parse_number};

/// Represents the raw data within a cell.
///
/// Serialized untagged, so it maps one-to-one onto JSON scalars
/// (`null`, numbers, strings, booleans).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Strict numeric view: only `Number` cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Lenient numeric view: numbers, plus text that parses as a number
    /// (`"12,5"`, `" 1 200 "`).
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_number(s),
            CellValue::Empty | CellValue::Boolean(_) => None,
        }
    }

    /// Returns the display value of the cell as a String.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => {
                if *b { "true" } else { "false" }.to_string()
            }
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}
