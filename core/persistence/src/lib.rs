//! FILENAME: core/persistence/src/lib.rs
//! Report Export Module
//!
//! Writes report rows to a single-sheet XLSX workbook. Rows are first laid
//! out as a styled sheet model (`sheet`), which the writer then renders
//! (`xlsx_writer`).

mod config;
mod error;
mod naming;
mod sheet;
mod xlsx_writer;

pub use config::{ExportConfig, LATE_FILL, ON_TIME_FILL};
pub use error::PersistenceError;
pub use naming::{export_file_name, export_file_name_today};
pub use sheet::{
    build_sheet, sanitize_sheet_name, split_bracket_color, ExportColumn, ExportSheet, StyleRule,
    StyledCell,
};
pub use xlsx_writer::{save_xlsx, write_xlsx};

use report_engine::{FlatRow, ReportView};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// EXPORT SOURCE
// ============================================================================

/// Which rows of a view are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportSource {
    /// The rows as displayed, collapsed groups included.
    #[default]
    Display,
    /// Filtered and sorted rows before grouping.
    Raw,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Exports rows in the given column order and returns the workbook bytes.
/// No rows gives a headers-only sheet.
pub fn export_to_spreadsheet<'a, I>(
    rows: I,
    columns: &[ExportColumn],
    rules: &[StyleRule],
    config: &ExportConfig,
) -> Result<Vec<u8>, PersistenceError>
where
    I: IntoIterator<Item = &'a FlatRow>,
{
    let sheet = build_sheet(rows, columns, rules, config);
    let bytes = write_xlsx(&sheet, config.bold_headers)?;
    engine::log_info!(
        "EXPORT",
        "sheet={} rows={} columns={} bytes={}",
        sheet.name,
        sheet.row_count(),
        columns.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Exports a computed view using its own column list.
pub fn export_view(
    view: &ReportView,
    source: ExportSource,
    rules: &[StyleRule],
    config: &ExportConfig,
) -> Result<Vec<u8>, PersistenceError> {
    let columns: Vec<ExportColumn> = view.columns.iter().map(ExportColumn::from).collect();
    match source {
        ExportSource::Display => export_to_spreadsheet(view.flat_rows(), &columns, rules, config),
        ExportSource::Raw => export_to_spreadsheet(&view.filtered_rows, &columns, rules, config),
    }
}

/// Exports a view into `dir` under the dated report file name and returns
/// the full path.
pub fn save_view(
    view: &ReportView,
    report_name: &str,
    source: ExportSource,
    rules: &[StyleRule],
    config: &ExportConfig,
    dir: &Path,
) -> Result<std::path::PathBuf, PersistenceError> {
    let bytes = export_view(view, source, rules, config)?;
    let path = dir.join(export_file_name_today(report_name));
    std::fs::write(&path, bytes)?;
    engine::log_info!("EXPORT", "saved {}", path.display());
    Ok(path)
}
