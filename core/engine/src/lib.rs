//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Shared value types for the report engine crates.
//! CONTEXT: Re-exports the cell value model, colours, text collation and
//! the category logging macros used by `report-engine` and `persistence`.

pub mod cell;
pub mod logging;
pub mod number_format;
pub mod style;
pub mod text;

// Re-export commonly used types at the crate root
pub use cell::CellValue;
pub use number_format::{format_number, parse_number};
pub use style::Color;
pub use text::{collate, contains_folded, fold_case};
