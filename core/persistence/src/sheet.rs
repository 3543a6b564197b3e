//! FILENAME: core/persistence/src/sheet.rs
//! Export sheet model.
//!
//! Rows are turned into a grid of `StyledCell`s before anything touches the
//! xlsx writer. Styling reads the rows and never changes them.

use engine::{CellValue, Color};
use report_engine::{ColumnDef, FlatRow};
use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;

/// Longest sheet name Excel accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

// ============================================================================
// COLUMNS AND RULES
// ============================================================================

/// One exported column: the row field it reads and its header text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub key: String,
    pub header: String,
}

impl ExportColumn {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        ExportColumn {
            key: key.into(),
            header: header.into(),
        }
    }
}

impl From<&ColumnDef> for ExportColumn {
    fn from(column: &ColumnDef) -> Self {
        ExportColumn::new(column.key.clone(), column.display_title())
    }
}

/// Conditional fill applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleRule {
    /// Text of the form `[#RRGGBB]rest` is written as `rest` on that fill.
    BracketColor { column: String },
    /// Numeric minutes, filled by comparison with the elapsed threshold.
    ElapsedTime { column: String },
}

impl StyleRule {
    pub fn column(&self) -> &str {
        match self {
            StyleRule::BracketColor { column } | StyleRule::ElapsedTime { column } => column,
        }
    }
}

// ============================================================================
// STYLED CELLS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledCell {
    pub value: CellValue,
    pub background: Option<Color>,
}

impl StyledCell {
    pub fn plain(value: CellValue) -> Self {
        StyledCell {
            value,
            background: None,
        }
    }

    /// Text used for column width measurement.
    pub fn display_text(&self) -> String {
        self.value.display_value()
    }
}

/// Splits `[#RRGGBB]rest` into its colour and `rest`.
pub fn split_bracket_color(text: &str) -> Option<(Color, &str)> {
    let inner = text.strip_prefix("[#")?;
    let end = inner.find(']')?;
    let color = Color::from_hex(&inner[..end])?;
    Some((color, &inner[end + 1..]))
}

fn style_cell(value: &CellValue, rule: Option<&StyleRule>, config: &ExportConfig) -> StyledCell {
    match (rule, value) {
        (Some(StyleRule::BracketColor { .. }), CellValue::Text(text)) => {
            match split_bracket_color(text) {
                Some((color, rest)) => StyledCell {
                    value: CellValue::text(rest),
                    background: Some(color),
                },
                None => StyledCell::plain(value.clone()),
            }
        }
        (Some(StyleRule::ElapsedTime { .. }), _) => {
            let background = value.to_number().map(|minutes| {
                if minutes > config.elapsed_threshold {
                    config.late_fill
                } else {
                    config.on_time_fill
                }
            });
            StyledCell {
                value: value.clone(),
                background,
            }
        }
        _ => StyledCell::plain(value.clone()),
    }
}

// ============================================================================
// EXPORT SHEET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<StyledCell>>,
    /// In characters, one per column.
    pub column_widths: Vec<f64>,
}

impl ExportSheet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Lays out `rows` under `columns` and applies the style rules. Fields a
/// row does not have are exported blank.
pub fn build_sheet<'a, I>(
    rows: I,
    columns: &[ExportColumn],
    rules: &[StyleRule],
    config: &ExportConfig,
) -> ExportSheet
where
    I: IntoIterator<Item = &'a FlatRow>,
{
    let column_rules: Vec<Option<&StyleRule>> = columns
        .iter()
        .map(|column| rules.iter().find(|rule| rule.column() == column.key))
        .collect();

    let mut max_chars: Vec<usize> = columns.iter().map(|c| c.header.chars().count()).collect();

    let styled_rows: Vec<Vec<StyledCell>> = rows
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .zip(&column_rules)
                .enumerate()
                .map(|(index, (column, rule))| {
                    let cell = match row.get(&column.key) {
                        Some(value) => style_cell(value, *rule, config),
                        None => StyledCell::default(),
                    };
                    max_chars[index] = max_chars[index].max(cell.display_text().chars().count());
                    cell
                })
                .collect()
        })
        .collect();

    ExportSheet {
        name: sanitize_sheet_name(&config.sheet_name),
        headers: columns.iter().map(|c| c.header.clone()).collect(),
        rows: styled_rows,
        column_widths: max_chars
            .into_iter()
            .map(|chars| chars as f64 + config.width_padding)
            .collect(),
    }
}

/// Makes a name Excel accepts: no `[]:*?/\`, no leading or trailing
/// apostrophe, at most 31 characters, never empty.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}
