//! FILENAME: core/persistence/src/config.rs
//! Export configuration.

use engine::Color;
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Default fill for elapsed times over the threshold.
pub const LATE_FILL: Color = Color::new(0xFF, 0x00, 0x00);

/// Default fill for elapsed times within the threshold.
pub const ON_TIME_FILL: Color = Color::new(0x00, 0xB0, 0x50);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,

    /// Characters added to the widest cell of each column.
    pub width_padding: f64,

    /// Minutes; values strictly above get `late_fill`.
    pub elapsed_threshold: f64,

    pub late_fill: Color,
    pub on_time_fill: Color,

    pub bold_headers: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            sheet_name: "Отчет".to_string(),
            width_padding: 2.0,
            elapsed_threshold: 40.0,
            late_fill: LATE_FILL,
            on_time_fill: ON_TIME_FILL,
            bold_headers: true,
        }
    }
}

impl ExportConfig {
    /// Load a config document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(json).map_err(PersistenceError::InvalidConfig)
    }
}
