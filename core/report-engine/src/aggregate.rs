//! FILENAME: core/report-engine/src/aggregate.rs
//! Group-aware aggregation and collapsing.
//!
//! A single pass over the filtered rows. Group rows are followed by their
//! item rows when expanded, or stand alone carrying the sum of those items
//! when collapsed. Item rows are never emitted on their own.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use engine::CellValue;

use crate::arena::FlatRow;
use crate::config::{EngineConfig, HierarchyKeys, OrphanPolicy};
use crate::definition::{collapse_key, CollapseState, Level};

/// An output row plus the metadata the table needs for its toggle icon.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub row: FlatRow,
    /// Set on group rows only.
    pub collapse_key: Option<String>,
    pub is_collapsed: bool,
    /// Number of filtered item rows under a group row.
    pub child_count: usize,
}

impl AggregatedRow {
    fn plain(row: FlatRow) -> Self {
        AggregatedRow {
            row,
            collapse_key: None,
            is_collapsed: false,
            child_count: 0,
        }
    }
}

type GroupKey = (String, String);

/// A group row without an enterprise of its own belongs to the last
/// enterprise row above it.
fn group_collapse_key(enterprise: &str, group: &str, current_enterprise: &str) -> String {
    if enterprise.is_empty() {
        collapse_key(current_enterprise, group)
    } else {
        collapse_key(enterprise, group)
    }
}

/// Collapse keys of every group row, in row order, as the grouping pass
/// assigns them.
pub fn group_collapse_keys(rows: &[FlatRow], keys: &HierarchyKeys) -> Vec<String> {
    let mut current_enterprise = String::new();
    let mut result = Vec::new();
    for row in rows {
        match row.level {
            Level::Enterprise => current_enterprise = row.enterprise(keys),
            Level::Group => result.push(group_collapse_key(
                &row.enterprise(keys),
                &row.group(keys),
                &current_enterprise,
            )),
            Level::Item => {}
        }
    }
    result
}

/// Runs the grouping pass and keeps the per-row metadata.
pub fn aggregate_rows(
    rows: &[FlatRow],
    collapsed: &CollapseState,
    config: &EngineConfig,
) -> Vec<AggregatedRow> {
    let keys = &config.keys;

    // Item rows by (enterprise, group), in filtered order.
    let mut items: FxHashMap<GroupKey, SmallVec<[usize; 8]>> = FxHashMap::default();
    let mut group_rows: FxHashSet<GroupKey> = FxHashSet::default();
    for (index, row) in rows.iter().enumerate() {
        match row.level {
            Level::Item => items
                .entry((row.enterprise(keys), row.group(keys)))
                .or_default()
                .push(index),
            Level::Group => {
                group_rows.insert((row.enterprise(keys), row.group(keys)));
            }
            Level::Enterprise => {}
        }
    }

    let mut output = Vec::with_capacity(rows.len());
    let mut current_enterprise = String::new();

    for row in rows {
        match row.level {
            Level::Enterprise => {
                current_enterprise = row.enterprise(keys);
                output.push(AggregatedRow::plain(row.clone()));
            }
            Level::Group => {
                let enterprise = row.enterprise(keys);
                let group = row.group(keys);
                let key = group_collapse_key(&enterprise, &group, &current_enterprise);
                let children = items
                    .get(&(enterprise.clone(), group.clone()))
                    .map(|c| c.as_slice())
                    .unwrap_or(&[]);
                let is_collapsed = collapsed.contains(&key);

                let mut group_row = row.clone();
                group_row.blank(&keys.enterprise);
                if is_collapsed {
                    let total: f64 = children.iter().map(|&i| rows[i].number(&keys.value)).sum();
                    group_row.set(&keys.value, CellValue::Number(total));
                }
                output.push(AggregatedRow {
                    row: group_row,
                    collapse_key: Some(key),
                    is_collapsed,
                    child_count: children.len(),
                });

                if !is_collapsed {
                    for &index in children {
                        let mut item = rows[index].clone();
                        item.blank(&keys.enterprise);
                        item.blank(&keys.group);
                        output.push(AggregatedRow::plain(item));
                    }
                }
            }
            Level::Item => {
                if config.orphan_policy == OrphanPolicy::Keep
                    && !group_rows.contains(&(row.enterprise(keys), row.group(keys)))
                {
                    output.push(AggregatedRow::plain(row.clone()));
                }
            }
        }
    }

    engine::log_debug!(
        "AGGREGATE",
        "rows in={} out={} collapsed={}",
        rows.len(),
        output.len(),
        collapsed.len()
    );
    output
}

/// Grouping pass returning plain rows.
pub fn aggregate_and_collapse(
    rows: &[FlatRow],
    collapsed: &CollapseState,
    config: &EngineConfig,
) -> Vec<FlatRow> {
    aggregate_rows(rows, collapsed, config)
        .into_iter()
        .map(|r| r.row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::flatten;
    use crate::response::Node;

    fn group_with(values: &[f64]) -> Vec<FlatRow> {
        let items = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Node::new(Level::Item)
                    .with("Описание", format!("Позиция {}", i + 1))
                    .with("Значение", *v)
            })
            .collect();
        let tree = vec![Node::new(Level::Enterprise)
            .with("Предприятие", "Точка А")
            .with_items(vec![Node::new(Level::Group)
                .with("Группа", "Напитки")
                .with("Значение", 99.0)
                .with_items(items)])];
        flatten(&tree, &EngineConfig::default().keys)
    }

    #[test]
    fn test_collapsed_group_sums_children() {
        let rows = group_with(&[10.0, 20.0, 30.0]);
        let collapsed: CollapseState = ["Точка А|Напитки"].into_iter().collect();
        let out = aggregate_rows(&rows, &collapsed, &EngineConfig::default());

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].row.get("Значение"), Some(&CellValue::Number(60.0)));
        assert!(out[1].is_collapsed);
        assert_eq!(out[1].child_count, 3);
        assert_eq!(out[1].row.get("Предприятие"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_expanded_group_keeps_own_value() {
        let rows = group_with(&[10.0, 20.0, 30.0]);
        let out = aggregate_rows(&rows, &CollapseState::new(), &EngineConfig::default());

        assert_eq!(out.len(), 5);
        assert_eq!(out[1].row.get("Значение"), Some(&CellValue::Number(99.0)));
        assert_eq!(out[1].collapse_key.as_deref(), Some("Точка А|Напитки"));
        for item in &out[2..] {
            assert_eq!(item.row.level, Level::Item);
            assert_eq!(item.row.get("Предприятие"), Some(&CellValue::Empty));
            assert_eq!(item.row.get("Группа"), Some(&CellValue::Empty));
        }
        let values: Vec<f64> = out[2..].iter().map(|r| r.row.number("Значение")).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_collapse_sum_follows_filtered_rows() {
        let mut rows = group_with(&[10.0, 20.0, 30.0]);
        rows.remove(3); // the 20.0 item was filtered out
        let collapsed: CollapseState = ["Точка А|Напитки"].into_iter().collect();
        let out = aggregate_and_collapse(&rows, &collapsed, &EngineConfig::default());
        assert_eq!(out[1].number("Значение"), 40.0);
    }

    #[test]
    fn test_enterprise_row_unchanged() {
        let rows = group_with(&[1.0]);
        let out = aggregate_and_collapse(&rows, &CollapseState::new(), &EngineConfig::default());
        assert_eq!(out[0], rows[0]);
    }

    #[test]
    fn test_orphan_items_dropped_by_default() {
        let rows = group_with(&[10.0, 20.0]);
        let orphans: Vec<FlatRow> = rows.iter().filter(|r| r.level != Level::Group).cloned().collect();
        let out = aggregate_and_collapse(&orphans, &CollapseState::new(), &EngineConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].level, Level::Enterprise);
    }

    #[test]
    fn test_orphan_items_kept_on_request() {
        let rows = group_with(&[10.0, 20.0]);
        let orphans: Vec<FlatRow> = rows.iter().filter(|r| r.level != Level::Group).cloned().collect();
        let config = EngineConfig {
            orphan_policy: OrphanPolicy::Keep,
            ..EngineConfig::default()
        };
        let out = aggregate_and_collapse(&orphans, &CollapseState::new(), &config);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].text("Группа"), "Напитки");
    }

    #[test]
    fn test_is_idempotent() {
        let rows = group_with(&[10.0, 20.0, 30.0]);
        let collapsed: CollapseState = ["Точка А|Напитки"].into_iter().collect();
        let config = EngineConfig::default();
        assert_eq!(
            aggregate_and_collapse(&rows, &collapsed, &config),
            aggregate_and_collapse(&rows, &collapsed, &config)
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_rows(&[], &CollapseState::new(), &EngineConfig::default()).is_empty());
    }
}
