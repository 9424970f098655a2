// src/config.rs

use crate::asc_models::Sheet;
use crate::error::Result;
use serde::Deserialize;

/// Tunables for turning detections into a schematic.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Junctions closer than this on one axis are pulled onto a shared line.
    pub junction_threshold: f64,
    /// LTspice grid unit. Junction and symbol coordinates land on multiples of it.
    pub grid: i32,
    /// Maximum deviation, in degrees, from an axis for a junction pair to form a wire.
    pub angle_tolerance: f64,
    pub version: String,
    pub sheet: Sheet,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        ReconstructConfig {
            junction_threshold: 50.0,
            grid: 16,
            angle_tolerance: 10.0,
            version: "4".to_string(),
            sheet: Sheet {
                number: 1,
                width: 880,
                height: 680,
            },
        }
    }
}

impl ReconstructConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
