//! FILENAME: core/report-engine/src/lib.rs
//! Hierarchical report table engine.
//!
//! Turns the enterprise → group → item tree returned by the analytics
//! backend into the ordered row list a report table renders.
//!
//! Layers:
//! - `definition`: Report columns and the caller-owned filter/collapse/sort state
//! - `response`: Parsing of the backend `{columns, data}` body into `Node`s
//! - `arena`: Flattened node storage with parent links (HOW we compute)
//! - `filter`, `sort`, `aggregate`: The pure pipeline stages
//! - `view`: Renderable output for the table (WHAT we display)
//! - `engine`: Runs the stages in order

pub mod aggregate;
pub mod arena;
pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod filter;
pub mod response;
pub mod sort;
pub mod state;
pub mod view;

pub use aggregate::{aggregate_and_collapse, aggregate_rows, group_collapse_keys, AggregatedRow};
pub use arena::{flatten, FlatRow, NodeArena, RowId};
pub use config::{EngineConfig, HierarchyKeys, OrphanPolicy};
pub use definition::*;
pub use self::engine::{calculate_report, ReportEngine};
pub use error::ReportError;
pub use filter::apply_filters;
pub use response::{parse_report_response, Node, ReportResponse};
pub use sort::{compare_cells, sort_hierarchical, sort_rows};
pub use state::ViewState;
pub use view::{group_options, ReportView, ViewRow};
