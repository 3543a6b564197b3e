//! FILENAME: core/report-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("Invalid engine config: {0}")]
    InvalidConfig(#[source] serde_json::Error),
}
