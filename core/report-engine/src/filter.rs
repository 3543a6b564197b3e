//! FILENAME: core/report-engine/src/filter.rs
//! Row filtering: global search, column filters and group selection.
//!
//! Every predicate is pure. Group selection needs to know which group rows
//! exist; it looks at the rows that pass the search and column predicates,
//! so running the filter again on its own output changes nothing.

use engine::{contains_folded, fold_case, CellValue};
use rustc_hash::FxHashSet;

use crate::arena::FlatRow;
use crate::config::EngineConfig;
use crate::definition::{FilterState, Level, ReportDefinition};
use crate::response::LEVEL_KEY;

/// A column filter after normalisation.
struct ColumnPredicate<'a> {
    key: &'a str,
    needle: String,
}

/// Applies all active filters and returns the surviving rows in input order.
pub fn apply_filters(
    rows: &[FlatRow],
    filters: &FilterState,
    definition: &ReportDefinition,
    config: &EngineConfig,
) -> Vec<FlatRow> {
    let search = fold_case(filters.search.trim());
    let predicates: Vec<ColumnPredicate> = filters
        .columns
        .iter()
        .filter(|(key, value)| !value.trim().is_empty() && definition.knows_column(key))
        .map(|(key, value)| ColumnPredicate {
            key: key.as_str(),
            needle: fold_case(value.trim()),
        })
        .collect();
    let empty_placeholder = fold_case(&config.empty_placeholder);

    let candidates: Vec<&FlatRow> = rows
        .iter()
        .filter(|row| matches_search(row, &search))
        .filter(|row| {
            predicates
                .iter()
                .all(|p| matches_column(row, p, &empty_placeholder))
        })
        .collect();

    let result: Vec<FlatRow> = match filters.selected_group.as_deref() {
        None => candidates.into_iter().cloned().collect(),
        Some(selected) => select_group(&candidates, selected, config),
    };

    engine::log_debug!(
        "FILTER",
        "rows in={} out={} columns={} search={} group={:?}",
        rows.len(),
        result.len(),
        predicates.len(),
        !search.is_empty(),
        filters.selected_group
    );
    result
}

fn matches_search(row: &FlatRow, search: &str) -> bool {
    search.is_empty() || contains_folded(&row.search_text(), search)
}

fn matches_column(row: &FlatRow, predicate: &ColumnPredicate, empty_placeholder: &str) -> bool {
    if predicate.key == LEVEL_KEY && row.get(LEVEL_KEY).is_none() {
        return contains_folded(&row.level.depth().to_string(), &predicate.needle);
    }
    match row.get(predicate.key) {
        None | Some(CellValue::Empty) => empty_placeholder.contains(&predicate.needle),
        Some(value) => contains_folded(&value.display_value(), &predicate.needle),
    }
}

/// Keeps enterprise rows that own the selected group, the selected group
/// rows themselves, and item rows whose group row is present and selected.
fn select_group(candidates: &[&FlatRow], selected: &str, config: &EngineConfig) -> Vec<FlatRow> {
    let keys = &config.keys;

    let mut enterprises: FxHashSet<String> = FxHashSet::default();
    let mut groups: FxHashSet<(String, String)> = FxHashSet::default();
    for row in candidates {
        if row.level == Level::Group && row.group(keys) == selected {
            let enterprise = row.enterprise(keys);
            enterprises.insert(enterprise.clone());
            groups.insert((enterprise, selected.to_string()));
        }
    }

    candidates
        .iter()
        .filter(|row| match row.level {
            Level::Enterprise => enterprises.contains(&row.enterprise(keys)),
            Level::Group => row.group(keys) == selected,
            Level::Item => {
                let group = row.group(keys);
                group == selected && groups.contains(&(row.enterprise(keys), group))
            }
        })
        .map(|row| (*row).clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::flatten;
    use crate::definition::ColumnDef;
    use crate::response::Node;

    fn rows() -> Vec<FlatRow> {
        let tree = vec![
            Node::new(Level::Enterprise)
                .with("Предприятие", "Точка А")
                .with("Значение", 20.0)
                .with_items(vec![
                    Node::new(Level::Group)
                        .with("Группа", "Напитки")
                        .with("Значение", 15.0)
                        .with_items(vec![
                            Node::new(Level::Item).with("Описание", "Кола").with("Значение", 10.0),
                            Node::new(Level::Item).with("Описание", "Сок").with("Значение", 5.0),
                        ]),
                    Node::new(Level::Group)
                        .with("Группа", "Десерты")
                        .with("Значение", 5.0)
                        .with_items(vec![Node::new(Level::Item)
                            .with("Описание", CellValue::Empty)
                            .with("Значение", 5.0)]),
                ]),
            Node::new(Level::Enterprise)
                .with("Предприятие", "Точка Б")
                .with_items(vec![Node::new(Level::Group)
                    .with("Группа", "Десерты")
                    .with_items(vec![Node::new(Level::Item).with("Описание", "Торт")])]),
        ];
        flatten(&tree, &EngineConfig::default().keys)
    }

    fn ids(rows: &[FlatRow]) -> Vec<usize> {
        rows.iter().map(|r| r.id).collect()
    }

    fn definition() -> ReportDefinition {
        ReportDefinition::new(
            "Продажи",
            vec![
                ColumnDef::new("Предприятие", "Предприятие"),
                ColumnDef::new("Группа", "Группа"),
                ColumnDef::new("Описание", "Описание"),
                ColumnDef::new("Значение", "Значение"),
            ],
        )
    }

    fn run(filters: &FilterState) -> Vec<FlatRow> {
        apply_filters(&rows(), filters, &definition(), &EngineConfig::default())
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        assert_eq!(run(&FilterState::new()).len(), rows().len());
    }

    #[test]
    fn test_global_search_is_case_insensitive() {
        let result = run(&FilterState::new().with_search("КОЛА"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_global_search_sees_inherited_fields() {
        // Items carry the inherited enterprise, so they match too.
        let result = run(&FilterState::new().with_search("точка б"));
        assert_eq!(ids(&result), vec![6, 7, 8]);
    }

    #[test]
    fn test_global_search_matches_level_number() {
        let tree = vec![Node::new(Level::Enterprise)
            .with("Предприятие", "Точка А")
            .with_items(vec![Node::new(Level::Group)
                .with("Группа", "Напитки")
                .with("Значение", 15.0)
                .with_items(vec![Node::new(Level::Item)
                    .with("Описание", "Кола")
                    .with("Значение", 10.0)])])];
        let flat = flatten(&tree, &EngineConfig::default().keys);
        let result = apply_filters(
            &flat,
            &FilterState::new().with_search("2"),
            &ReportDefinition::default(),
            &EngineConfig::default(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text("Описание"), "Кола");
    }

    #[test]
    fn test_column_filter_on_level_reads_row_level() {
        let result = apply_filters(
            &rows(),
            &FilterState::new().with_column("level", "1"),
            &ReportDefinition::default(),
            &EngineConfig::default(),
        );
        assert_eq!(ids(&result), vec![1, 4, 7]);
    }

    #[test]
    fn test_column_filter_substring() {
        let result = run(&FilterState::new().with_column("Описание", "о"));
        // "Кола", "Сок", "Торт"; every other row has no description.
        assert_eq!(ids(&result), vec![2, 3, 8]);
    }

    #[test]
    fn test_column_filter_matches_empty_placeholder() {
        let result = run(&FilterState::new().with_column("Описание", "empty"));
        // Rows without a description, including the explicit null one.
        assert_eq!(ids(&result), vec![0, 1, 4, 5, 6, 7]);
    }

    #[test]
    fn test_unknown_filter_column_is_ignored() {
        let result = run(&FilterState::new().with_column("Склад", "центральный"));
        assert_eq!(result.len(), rows().len());
    }

    #[test]
    fn test_filters_are_anded() {
        let filters = FilterState::new()
            .with_search("точка а")
            .with_column("Значение", "5");
        let result = run(&filters);
        assert_eq!(ids(&result), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_group_selection_levels() {
        let result = run(&FilterState::new().with_group("Десерты"));
        assert_eq!(ids(&result), vec![0, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_group_selection_needs_present_group_row() {
        // Only Точка Б rows pass the search, so Точка А drops out even
        // though it owns a "Десерты" group.
        let filters = FilterState::new().with_group("Десерты").with_search("точка б");
        let result = run(&filters);
        assert_eq!(ids(&result), vec![6, 7, 8]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filters = FilterState::new()
            .with_group("Напитки")
            .with_column("Описание", "empty");
        let once = run(&filters);
        let twice = apply_filters(&once, &filters, &definition(), &EngineConfig::default());
        assert_eq!(once, twice);
    }
}
