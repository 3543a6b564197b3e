//! FILENAME: core/report-engine/src/view.rs
//! Report View - the rendered output of one recomputation.
//!
//! Rows are already in display order. The table reads `display_text` per
//! column, `level` for indentation and the collapse fields for its toggle.

use serde::{Deserialize, Serialize};

use engine::collate;

use crate::aggregate::AggregatedRow;
use crate::arena::FlatRow;
use crate::config::{EngineConfig, HierarchyKeys};
use crate::definition::{ColumnDef, Level};

// ============================================================================
// VIEW ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub row: FlatRow,
    pub collapse_key: Option<String>,
    pub is_expandable: bool,
    pub is_collapsed: bool,
    pub child_count: usize,
}

impl ViewRow {
    pub fn level(&self) -> Level {
        self.row.level
    }

    /// Indent depth for the first column.
    pub fn indent(&self) -> u8 {
        self.row.level.depth()
    }

    /// Cell text for a column: the missing placeholder when the row has no
    /// such field, empty for a blanked field.
    pub fn display_text(&self, key: &str, config: &EngineConfig) -> String {
        match self.row.get(key) {
            Some(value) => value.display_value(),
            None => config.missing_placeholder.clone(),
        }
    }
}

impl From<AggregatedRow> for ViewRow {
    fn from(aggregated: AggregatedRow) -> Self {
        ViewRow {
            is_expandable: aggregated.collapse_key.is_some() && aggregated.child_count > 0,
            collapse_key: aggregated.collapse_key,
            is_collapsed: aggregated.is_collapsed,
            child_count: aggregated.child_count,
            row: aggregated.row,
        }
    }
}

// ============================================================================
// REPORT VIEW
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub columns: Vec<ColumnDef>,
    /// Display rows after filtering, sorting and collapsing.
    pub rows: Vec<ViewRow>,
    /// Filtered and sorted rows before grouping, for raw export.
    pub filtered_rows: Vec<FlatRow>,
    /// Choices for the group selector.
    pub group_options: Vec<String>,
    /// Row count of the flattened tree before filtering.
    pub total_rows: usize,
}

impl ReportView {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display rows as plain flat rows, e.g. for export.
    pub fn flat_rows(&self) -> impl Iterator<Item = &FlatRow> + '_ {
        self.rows.iter().map(|r| &r.row)
    }
}

/// Distinct non-empty group names of the level-1 rows, locale-sorted.
pub fn group_options(rows: &[FlatRow], keys: &HierarchyKeys) -> Vec<String> {
    let mut groups: Vec<String> = rows
        .iter()
        .filter(|r| r.level == Level::Group)
        .map(|r| r.group(keys))
        .filter(|g| !g.is_empty())
        .collect();
    groups.sort_by(|a, b| collate(a, b));
    groups.dedup();
    groups
}
