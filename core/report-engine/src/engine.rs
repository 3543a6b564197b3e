//! FILENAME: core/report-engine/src/engine.rs
//! Report Engine - runs the table pipeline for one report.
//!
//! Holds the report's column definition and the engine configuration, and
//! turns a freshly fetched tree plus the caller's `ViewState` into a
//! `ReportView`.
//!
//! Pipeline:
//! 1. Flatten the tree into pre-order rows with inherited dimensions
//! 2. Filter (search, column filters, group selection)
//! 3. Sort siblings under each parent
//! 4. Group and collapse, summing the items of collapsed groups
//! 5. Wrap the result with display metadata

use crate::aggregate::{aggregate_and_collapse, aggregate_rows};
use crate::arena::{flatten, FlatRow};
use crate::config::EngineConfig;
use crate::definition::{CollapseState, FilterState, ReportDefinition, SortState};
use crate::error::ReportError;
use crate::filter::apply_filters;
use crate::response::{parse_report_response, Node, ReportResponse};
use crate::sort::{sort_hierarchical, sort_rows};
use crate::state::ViewState;
use crate::view::{group_options, ReportView, ViewRow};

// ============================================================================
// REPORT ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReportEngine {
    config: EngineConfig,
    definition: ReportDefinition,
}

impl ReportEngine {
    pub fn new(definition: ReportDefinition, config: EngineConfig) -> Self {
        ReportEngine { config, definition }
    }

    pub fn with_defaults(definition: ReportDefinition) -> Self {
        Self::new(definition, EngineConfig::default())
    }

    /// Engine for a decoded response, using the columns it announced.
    pub fn from_response(
        name: impl Into<String>,
        response: &ReportResponse,
        config: EngineConfig,
    ) -> Self {
        Self::new(
            ReportDefinition::new(name, response.columns.clone()),
            config,
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn definition(&self) -> &ReportDefinition {
        &self.definition
    }

    // ========================================================================
    // PIPELINE STAGES
    // ========================================================================

    pub fn flatten(&self, tree: &[Node]) -> Vec<FlatRow> {
        flatten(tree, &self.config.keys)
    }

    pub fn apply_filters(&self, rows: &[FlatRow], filters: &FilterState) -> Vec<FlatRow> {
        apply_filters(rows, filters, &self.definition, &self.config)
    }

    pub fn aggregate_and_collapse(&self, rows: &[FlatRow], collapsed: &CollapseState) -> Vec<FlatRow> {
        aggregate_and_collapse(rows, collapsed, &self.config)
    }

    /// Flat stable sort over the whole list.
    pub fn sort(&self, rows: &[FlatRow], sort: Option<&SortState>) -> Vec<FlatRow> {
        sort_rows(rows, sort, &self.definition, &self.config)
    }

    /// Sort that keeps every row under its parent.
    pub fn sort_hierarchical(&self, rows: &[FlatRow], sort: Option<&SortState>) -> Vec<FlatRow> {
        sort_hierarchical(rows, sort, &self.definition, &self.config)
    }

    // ========================================================================
    // FULL RECOMPUTATION
    // ========================================================================

    /// Runs every stage for the current state.
    pub fn calculate(&self, tree: &[Node], state: &ViewState) -> ReportView {
        engine::log_enter!(
            "ENGINE",
            "calculate",
            "report={} collapsed={}",
            self.definition.name,
            state.collapsed.len()
        );

        let flat = self.flatten(tree);
        let filtered = self.apply_filters(&flat, &state.filters);
        let sorted = self.sort_hierarchical(&filtered, state.sort.as_ref());
        let rows: Vec<ViewRow> = aggregate_rows(&sorted, &state.collapsed, &self.config)
            .into_iter()
            .map(ViewRow::from)
            .collect();

        let view = ReportView {
            columns: self.definition.columns.clone(),
            group_options: group_options(&flat, &self.config.keys),
            total_rows: flat.len(),
            filtered_rows: sorted,
            rows,
        };

        engine::log_exit!(
            "ENGINE",
            "calculate",
            "total={} filtered={} shown={}",
            view.total_rows,
            view.filtered_rows.len(),
            view.rows.len()
        );
        view
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Decodes an endpoint body and computes its view in one call.
pub fn calculate_report(
    body: &str,
    report_name: &str,
    state: &ViewState,
    config: &EngineConfig,
) -> Result<ReportView, ReportError> {
    let response = parse_report_response(body)?;
    let engine = ReportEngine::from_response(report_name, &response, config.clone());
    Ok(engine.calculate(&response.data, state))
}
