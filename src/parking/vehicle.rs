//! Vehicle value object and registration-number rules.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{ParkingError, ParkingResult};
use super::types::VehicleType;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\s-]*$").expect("vehicle number pattern is valid")
    })
}

/// Check a raw vehicle number against the accepted format
pub fn validate_vehicle_number(number: &str) -> ParkingResult<()> {
    if number.trim().is_empty() {
        return Err(ParkingError::InvalidVehicleNumber {
            number: number.to_string(),
            reason: "vehicle number cannot be empty".into(),
        });
    }

    if !number_pattern().is_match(number) {
        return Err(ParkingError::InvalidVehicleNumber {
            number: number.to_string(),
            reason: "must start with a letter or digit and contain only letters, digits, spaces and hyphens".into(),
        });
    }

    Ok(())
}

/// Canonical form: upper case, trimmed, whitespace runs collapsed to one space
pub fn normalize_vehicle_number(number: &str) -> String {
    number
        .split_whitespace()
        .map(|part| part.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate then normalize in one step
pub fn canonical_vehicle_number(number: &str) -> ParkingResult<String> {
    validate_vehicle_number(number)?;
    Ok(normalize_vehicle_number(number))
}

/// A vehicle that can be parked in the lot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vehicle {
    vehicle_type: VehicleType,
    number: String,
}

impl Vehicle {
    /// Create a vehicle, validating and normalizing its number
    pub fn new(vehicle_type: VehicleType, number: &str) -> ParkingResult<Self> {
        Ok(Self {
            vehicle_type,
            number: canonical_vehicle_number(number)?,
        })
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    /// Normalized registration number
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.vehicle_type.display_name(), self.number)
    }
}
