//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::sheet::{ExportSheet, StyledCell};
use crate::PersistenceError;
use engine::{CellValue, Color};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

/// Renders the sheet into xlsx bytes. Row 0 holds the headers.
pub fn write_xlsx(sheet: &ExportSheet, bold_headers: bool) -> Result<Vec<u8>, PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(&sheet.name)?;

    let header_format = if bold_headers {
        Format::new().set_bold()
    } else {
        Format::new()
    };
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    // Widths are in characters, the unit Excel uses for columns
    for (col, width) in sheet.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (index, cells) in sheet.rows.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell)?;
        }
    }

    Ok(xlsx.save_to_buffer()?)
}

/// Writes the sheet to `path`.
pub fn save_xlsx(sheet: &ExportSheet, bold_headers: bool, path: &Path) -> Result<(), PersistenceError> {
    let bytes = write_xlsx(sheet, bold_headers)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &StyledCell,
) -> Result<(), PersistenceError> {
    let format = cell.background.as_ref().map(fill_format);

    match &cell.value {
        CellValue::Empty => {
            // A blank cell only exists in the file when it carries a fill
            if let Some(fmt) = format {
                worksheet.write_blank(row, col, &fmt)?;
            }
        }
        CellValue::Number(n) => {
            if let Some(fmt) = format {
                worksheet.write_number_with_format(row, col, *n, &fmt)?;
            } else {
                worksheet.write_number(row, col, *n)?;
            }
        }
        CellValue::Text(s) => {
            if let Some(fmt) = format {
                worksheet.write_string_with_format(row, col, s, &fmt)?;
            } else {
                worksheet.write_string(row, col, s)?;
            }
        }
        CellValue::Boolean(b) => {
            if let Some(fmt) = format {
                worksheet.write_boolean_with_format(row, col, *b, &fmt)?;
            } else {
                worksheet.write_boolean(row, col, *b)?;
            }
        }
    }
    Ok(())
}

fn fill_format(color: &Color) -> Format {
    Format::new().set_background_color(rust_xlsxwriter::Color::RGB(color.to_rgb()))
}
