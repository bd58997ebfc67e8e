//! Lot configuration
//!
//! Loaded from a JSON file or built in code. Every field has a default so
//! an empty object `{}` is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ParkingError, ParkingResult};
use super::layout::validate_dimensions;
use super::types::MatchingPolicy;

/// Configuration for a parking lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotConfig {
    /// Display name (default: "Parking Lot")
    #[serde(default = "default_name")]
    pub name: String,

    /// Number of floors, 1-8 (default: 3)
    #[serde(default = "default_floors")]
    pub floors: usize,

    /// Rows per floor, 1-1000 (default: 5)
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Columns per row, 1-1000 (default: 10)
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// One-to-one vehicle/spot matching; `false` lets smaller vehicles use
    /// larger spots (default: true)
    #[serde(default = "default_strict_matching")]
    pub strict_matching: bool,

    /// Scan-and-claim attempts per park before reporting contention
    /// (default: 3)
    #[serde(default = "default_max_park_attempts")]
    pub max_park_attempts: usize,
}

fn default_name() -> String {
    "Parking Lot".to_string()
}
fn default_floors() -> usize {
    3
}
fn default_rows() -> usize {
    5
}
fn default_columns() -> usize {
    10
}
fn default_strict_matching() -> bool {
    true
}
fn default_max_park_attempts() -> usize {
    3
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            floors: default_floors(),
            rows: default_rows(),
            columns: default_columns(),
            strict_matching: default_strict_matching(),
            max_park_attempts: default_max_park_attempts(),
        }
    }
}

impl LotConfig {
    /// Config with the given dimensions and defaults elsewhere
    pub fn with_dimensions(name: impl Into<String>, floors: usize, rows: usize, columns: usize) -> Self {
        Self {
            name: name.into(),
            floors,
            rows,
            columns,
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ParkingResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ParkingError::InvalidOperation {
            operation: "load_config",
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let config: LotConfig =
            serde_json::from_str(&content).map_err(|e| ParkingError::InvalidOperation {
                operation: "load_config",
                reason: format!("invalid config JSON: {}", e),
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ParkingResult<()> {
        validate_dimensions(self.floors, self.rows, self.columns)?;

        if self.max_park_attempts == 0 {
            return Err(ParkingError::InvalidOperation {
                operation: "validate_config",
                reason: "max_park_attempts must be > 0".into(),
            });
        }

        Ok(())
    }

    pub fn matching_policy(&self) -> MatchingPolicy {
        MatchingPolicy::from_strict(self.strict_matching)
    }
}
