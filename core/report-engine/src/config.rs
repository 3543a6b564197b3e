//! FILENAME: core/report-engine/src/config.rs
//! Engine configuration.
//!
//! Everything the pipeline needs to know about a report feed that is not
//! part of the data itself: which keys carry the hierarchy, what the table
//! shows for blank and missing cells, and how orphaned rows are treated.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Field keys that carry the hierarchy roles inside a node record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyKeys {
    /// Enterprise (point of sale) name, set on level-0 nodes.
    pub enterprise: String,
    /// Group name, set on level-1 nodes.
    pub group: String,
    /// Numeric measure summed when a group is collapsed.
    pub value: String,
}

impl Default for HierarchyKeys {
    fn default() -> Self {
        HierarchyKeys {
            enterprise: "Предприятие".to_string(),
            group: "Группа".to_string(),
            value: "Значение".to_string(),
        }
    }
}

/// What happens to a level-2 row whose level-1 parent is not in the
/// filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Drop the row (matches the grouping pass of the web table).
    #[default]
    Drop,
    /// Emit the row on its own, with its dimension fields intact.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub keys: HierarchyKeys,

    /// Text a column filter is matched against when the cell is null.
    pub empty_placeholder: String,

    /// Text rendered for a column the row does not have at all.
    pub missing_placeholder: String,

    /// Column-key substrings that turn on date parsing in numeric sorts.
    pub date_column_hints: Vec<String>,

    pub orphan_policy: OrphanPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            keys: HierarchyKeys::default(),
            empty_placeholder: "Empty".to_string(),
            missing_placeholder: "—".to_string(),
            date_column_hints: vec!["time".to_string(), "date".to_string()],
            orphan_policy: OrphanPolicy::Drop,
        }
    }
}

impl EngineConfig {
    /// Load a config document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(ReportError::InvalidConfig)
    }

    /// True when numeric sorting on `column` should try to read dates.
    pub fn is_date_column(&self, column: &str) -> bool {
        let column = column.to_lowercase();
        self.date_column_hints
            .iter()
            .any(|hint| !hint.is_empty() && column.contains(&hint.to_lowercase()))
    }
}
