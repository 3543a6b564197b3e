//! FILENAME: core/report-engine/src/definition.rs
//! Report Definition - columns plus the caller-owned view state objects.
//!
//! These structures DESCRIBE a report table and what the user asked of it.
//! They are plain snapshots: the engine never mutates them, every change is
//! a replacement followed by a full recomputation.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// LEVEL
// ============================================================================

/// Depth tag of a node: enterprise, group or line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Level {
    Enterprise,
    Group,
    Item,
}

impl Level {
    /// Maps a raw depth; anything deeper than 2 is treated as an item.
    pub fn from_depth(depth: u64) -> Self {
        match depth {
            0 => Level::Enterprise,
            1 => Level::Group,
            _ => Level::Item,
        }
    }

    pub fn depth(self) -> u8 {
        match self {
            Level::Enterprise => 0,
            Level::Group => 1,
            Level::Item => 2,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Enterprise
    }
}

impl From<u8> for Level {
    fn from(depth: u8) -> Self {
        Level::from_depth(depth as u64)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.depth()
    }
}

// ============================================================================
// COLUMNS
// ============================================================================

/// One column as announced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default = "default_filterable")]
    pub filterable: bool,
}

fn default_filterable() -> bool {
    true
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        ColumnDef {
            key: key.into(),
            title: title.into(),
            width: None,
            filterable: true,
        }
    }

    /// Header text: the title, or the key when the backend sent none.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.key
        } else {
            &self.title
        }
    }
}

/// A report: its name (used for export file names) and its columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl ReportDefinition {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        ReportDefinition {
            name: name.into(),
            columns,
        }
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Whether filters and sorts on `key` apply. A definition without
    /// columns accepts every key.
    pub fn knows_column(&self, key: &str) -> bool {
        self.columns.is_empty() || self.column(key).is_some()
    }
}

// ============================================================================
// FILTER STATE
// ============================================================================

/// Column filters, global search and group selection. All ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Column key -> substring filter.
    pub columns: BTreeMap<String, String>,

    /// Free-text search across every scalar field.
    pub search: String,

    /// Restricts the table to one group.
    pub selected_group: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.insert(key.into(), value.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.selected_group = Some(group.into());
        self
    }

    /// True when at least one predicate would reject something.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.selected_group.is_some()
            || self.columns.values().any(|v| !v.trim().is_empty())
    }
}

// ============================================================================
// COLLAPSE STATE
// ============================================================================

/// Builds the `enterprise|group` key that identifies a group row.
pub fn collapse_key(enterprise: &str, group: &str) -> String {
    format!("{}|{}", enterprise, group)
}

/// Set of collapsed group keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseState {
    keys: FxHashSet<String>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.keys.remove(key)
    }

    /// Flips the key and returns whether it is now collapsed.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CollapseState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CollapseState {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// SORT STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    AscendingNumeric,
    DescendingNumeric,
    AscendingAlphabetic,
    DescendingAlphabetic,
}

impl SortMode {
    pub fn ascending(numeric: bool) -> Self {
        if numeric {
            SortMode::AscendingNumeric
        } else {
            SortMode::AscendingAlphabetic
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, SortMode::AscendingNumeric | SortMode::DescendingNumeric)
    }

    pub fn is_descending(self) -> bool {
        matches!(self, SortMode::DescendingNumeric | SortMode::DescendingAlphabetic)
    }

    /// Same comparison family, opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortMode::AscendingNumeric => SortMode::DescendingNumeric,
            SortMode::DescendingNumeric => SortMode::AscendingNumeric,
            SortMode::AscendingAlphabetic => SortMode::DescendingAlphabetic,
            SortMode::DescendingAlphabetic => SortMode::AscendingAlphabetic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub mode: SortMode,
}

impl SortState {
    pub fn new(column: impl Into<String>, mode: SortMode) -> Self {
        SortState {
            column: column.into(),
            mode,
        }
    }
}
