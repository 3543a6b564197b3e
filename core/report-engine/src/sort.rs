//! FILENAME: core/report-engine/src/sort.rs
//! Row sorting.
//!
//! Numeric modes compare numbers, then dates (for columns whose key hints
//! at a date or time), then numbers parsed from text, and finally fall back
//! to text. Alphabetic modes always use collation. Null cells go last in
//! both directions, and all sorts are stable.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use engine::{collate, CellValue};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::arena::FlatRow;
use crate::config::EngineConfig;
use crate::definition::{ReportDefinition, SortMode, SortState};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Reads the date/time shapes the analytics backend sends. Bare times are
/// placed on a fixed day so they order among themselves.
fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return NaiveDate::from_ymd_opt(1970, 1, 1).map(|day| day.and_time(time));
        }
    }
    None
}

fn compare_numeric(a: &CellValue, b: &CellValue, column: &str, config: &EngineConfig) -> Ordering {
    if let (CellValue::Number(x), CellValue::Number(y)) = (a, b) {
        return x.partial_cmp(y).unwrap_or(Ordering::Equal);
    }
    if config.is_date_column(column) {
        if let (Some(x), Some(y)) = (
            parse_date_time(&a.display_value()),
            parse_date_time(&b.display_value()),
        ) {
            return x.cmp(&y);
        }
    }
    if let (Some(x), Some(y)) = (a.to_number(), b.to_number()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    collate(&a.display_value(), &b.display_value())
}

/// Compares two cells of `column`. Null or missing cells sort after
/// everything else whatever the direction.
pub fn compare_cells(
    a: Option<&CellValue>,
    b: Option<&CellValue>,
    column: &str,
    mode: SortMode,
    config: &EngineConfig,
) -> Ordering {
    let a = a.filter(|v| !v.is_empty());
    let b = b.filter(|v| !v.is_empty());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = if mode.is_numeric() {
                compare_numeric(a, b, column, config)
            } else {
                collate(&a.display_value(), &b.display_value())
            };
            if mode.is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

fn row_order(a: &FlatRow, b: &FlatRow, sort: &SortState, config: &EngineConfig) -> Ordering {
    compare_cells(a.get(&sort.column), b.get(&sort.column), &sort.column, sort.mode, config)
}

/// Stable sort of a flat row list. No sort state, or a column the report
/// does not know, leaves the order untouched.
pub fn sort_rows(
    rows: &[FlatRow],
    sort: Option<&SortState>,
    definition: &ReportDefinition,
    config: &EngineConfig,
) -> Vec<FlatRow> {
    let mut sorted = rows.to_vec();
    if let Some(sort) = sort.filter(|s| definition.knows_column(&s.column)) {
        sorted.sort_by(|a, b| row_order(a, b, sort, config));
    }
    sorted
}

/// Sorts siblings under each parent and re-emits the rows in pre-order, so
/// groups stay under their enterprise and items under their group. A row
/// whose parent is not in `rows` is treated as a root.
pub fn sort_hierarchical(
    rows: &[FlatRow],
    sort: Option<&SortState>,
    definition: &ReportDefinition,
    config: &EngineConfig,
) -> Vec<FlatRow> {
    let Some(sort) = sort.filter(|s| definition.knows_column(&s.column)) else {
        return rows.to_vec();
    };

    let position: FxHashMap<usize, usize> =
        rows.iter().enumerate().map(|(pos, row)| (row.id, pos)).collect();

    let mut roots: SmallVec<[usize; 8]> = SmallVec::new();
    let mut children: Vec<SmallVec<[usize; 8]>> = vec![SmallVec::new(); rows.len()];
    for (pos, row) in rows.iter().enumerate() {
        match row.parent.and_then(|parent| position.get(&parent)) {
            Some(&parent_pos) => children[parent_pos].push(pos),
            None => roots.push(pos),
        }
    }

    let by_column = |&x: &usize, &y: &usize| row_order(&rows[x], &rows[y], sort, config);
    roots.sort_by(by_column);
    for siblings in children.iter_mut() {
        siblings.sort_by(by_column);
    }

    let mut sorted = Vec::with_capacity(rows.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(pos) = stack.pop() {
        sorted.push(rows[pos].clone());
        stack.extend(children[pos].iter().rev().copied());
    }

    engine::log_debug!(
        "SORT",
        "column={} mode={:?} rows={}",
        sort.column,
        sort.mode,
        sorted.len()
    );
    sorted
}
