//! Spot and vehicle type enumerations plus the compatibility rules
//! between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ParkingError;

/// Which vehicle types a spot type admits
///
/// `Strict` is one-to-one. `Hierarchical` lets smaller vehicles fall back
/// to larger spots (bicycle → motorcycle → automobile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingPolicy {
    #[default]
    Strict,
    Hierarchical,
}

impl MatchingPolicy {
    /// Maps the `strict_matching` configuration flag to a policy
    pub fn from_strict(strict_matching: bool) -> Self {
        if strict_matching {
            MatchingPolicy::Strict
        } else {
            MatchingPolicy::Hierarchical
        }
    }
}

/// Type of a parking spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotType {
    Bicycle,
    Motorcycle,
    Automobile,
    Inactive,
}

impl SpotType {
    /// All spot types in display order
    pub const ALL: [SpotType; 4] = [
        SpotType::Bicycle,
        SpotType::Motorcycle,
        SpotType::Automobile,
        SpotType::Inactive,
    ];

    /// Spot types that can hold a vehicle
    pub const ACTIVE: [SpotType; 3] = [SpotType::Bicycle, SpotType::Motorcycle, SpotType::Automobile];

    /// Returns the wire code, e.g. `B-1`
    pub fn code(&self) -> &'static str {
        match self {
            SpotType::Bicycle => "B-1",
            SpotType::Motorcycle => "M-1",
            SpotType::Automobile => "A-1",
            SpotType::Inactive => "X-0",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SpotType::Bicycle => "Bicycle Spot",
            SpotType::Motorcycle => "Motorcycle Spot",
            SpotType::Automobile => "Automobile Spot",
            SpotType::Inactive => "Inactive Spot",
        }
    }

    pub fn is_active(&self) -> bool {
        *self != SpotType::Inactive
    }

    /// Whether a vehicle of the given type may occupy this spot type
    pub fn accepts(&self, vehicle_type: VehicleType, policy: MatchingPolicy) -> bool {
        match policy {
            MatchingPolicy::Strict => vehicle_type.preferred_spot_type() == *self,
            MatchingPolicy::Hierarchical => vehicle_type
                .compatible_spot_types(policy)
                .contains(self),
        }
    }

    /// Grid symbol: upper case when free, lower case when occupied
    pub fn symbol(&self, occupied: bool) -> char {
        let c = match self {
            SpotType::Bicycle => 'B',
            SpotType::Motorcycle => 'M',
            SpotType::Automobile => 'A',
            SpotType::Inactive => return 'X',
        };
        if occupied {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }
}

impl fmt::Display for SpotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for SpotType {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B-1" => Ok(SpotType::Bicycle),
            "M-1" => Ok(SpotType::Motorcycle),
            "A-1" => Ok(SpotType::Automobile),
            "X-0" => Ok(SpotType::Inactive),
            _ => Err(ParkingError::InvalidSpotType(s.to_string())),
        }
    }
}

/// Type of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Bicycle,
    Motorcycle,
    Automobile,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [
        VehicleType::Bicycle,
        VehicleType::Motorcycle,
        VehicleType::Automobile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Bicycle => "BICYCLE",
            VehicleType::Motorcycle => "MOTORCYCLE",
            VehicleType::Automobile => "AUTOMOBILE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VehicleType::Bicycle => "Bicycle",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Automobile => "Automobile",
        }
    }

    /// The spot type sized exactly for this vehicle
    pub fn preferred_spot_type(&self) -> SpotType {
        match self {
            VehicleType::Bicycle => SpotType::Bicycle,
            VehicleType::Motorcycle => SpotType::Motorcycle,
            VehicleType::Automobile => SpotType::Automobile,
        }
    }

    /// Spot types this vehicle may use, preferred first
    pub fn compatible_spot_types(&self, policy: MatchingPolicy) -> &'static [SpotType] {
        match (policy, self) {
            (MatchingPolicy::Strict, VehicleType::Bicycle) => &[SpotType::Bicycle],
            (MatchingPolicy::Strict, VehicleType::Motorcycle) => &[SpotType::Motorcycle],
            (_, VehicleType::Automobile) => &[SpotType::Automobile],
            (MatchingPolicy::Hierarchical, VehicleType::Bicycle) => {
                &[SpotType::Bicycle, SpotType::Motorcycle, SpotType::Automobile]
            }
            (MatchingPolicy::Hierarchical, VehicleType::Motorcycle) => {
                &[SpotType::Motorcycle, SpotType::Automobile]
            }
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BICYCLE" | "B" | "BIKE" => Ok(VehicleType::Bicycle),
            "MOTORCYCLE" | "M" | "MOTORBIKE" => Ok(VehicleType::Motorcycle),
            "AUTOMOBILE" | "A" | "CAR" | "AUTO" => Ok(VehicleType::Automobile),
            _ => Err(ParkingError::InvalidVehicleType(s.to_string())),
        }
    }
}
