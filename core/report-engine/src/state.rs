//! FILENAME: core/report-engine/src/state.rs
//! View State - what the user has asked of the table.
//!
//! Owned by the caller and passed whole into every recomputation. Each
//! method is one user gesture; none of them touches row data.

use serde::{Deserialize, Serialize};

use crate::aggregate::group_collapse_keys;
use crate::arena::FlatRow;
use crate::config::HierarchyKeys;
use crate::definition::{collapse_key, CollapseState, FilterState, SortMode, SortState};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub filters: FilterState,
    pub collapsed: CollapseState,
    pub sort: Option<SortState>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column filter; an empty value removes it.
    pub fn set_column_filter(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.filters.columns.remove(key);
        } else {
            self.filters.columns.insert(key.to_string(), value.to_string());
        }
    }

    pub fn clear_column_filters(&mut self) {
        self.filters.columns.clear();
    }

    pub fn set_search(&mut self, search: &str) {
        self.filters.search = search.to_string();
    }

    /// Selects a group, or clears the selection with `None`.
    pub fn select_group(&mut self, group: Option<&str>) {
        self.filters.selected_group = group.map(str::to_string);
    }

    /// Flips one group and returns whether it is now collapsed.
    pub fn toggle_group(&mut self, enterprise: &str, group: &str) -> bool {
        self.collapsed.toggle(&collapse_key(enterprise, group))
    }

    /// Collapses every group row found in `rows`.
    pub fn collapse_all(&mut self, rows: &[FlatRow], keys: &HierarchyKeys) {
        for key in group_collapse_keys(rows, keys) {
            self.collapsed.insert(key);
        }
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Header click: unsorted → ascending → descending → unsorted. Clicking
    /// another column starts over at ascending.
    pub fn cycle_sort(&mut self, column: &str, numeric: bool) {
        self.sort = match self.sort.take() {
            Some(current) if current.column == column => {
                if current.mode.is_descending() {
                    None
                } else {
                    Some(SortState::new(column, current.mode.reversed()))
                }
            }
            _ => Some(SortState::new(column, SortMode::ascending(numeric))),
        };
    }

    /// Switching to another report definition starts from a clean slate.
    /// Re-fetching the same report for a new date range keeps the state.
    pub fn reset_for_report(&mut self) {
        *self = ViewState::default();
    }
}
