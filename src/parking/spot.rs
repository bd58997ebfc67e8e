//! # Parking Spot
//!
//! A single addressable cell. Each spot carries its own `RwLock`, so
//! occupy/vacate on one spot never contends with any other spot.
//!
//! Spot IDs are values (`floor-row-column`), never back-references into
//! the floor or lot that owns the spot.

use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::{ParkingError, ParkingResult};
use super::types::{MatchingPolicy, SpotType, VehicleType};
use super::vehicle::{canonical_vehicle_number, normalize_vehicle_number};

/// Coordinates of a spot, rendered as `"{floor}-{row}-{column}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotId {
    pub floor: usize,
    pub row: usize,
    pub column: usize,
}

impl SpotId {
    pub fn new(floor: usize, row: usize, column: usize) -> Self {
        Self { floor, row, column }
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.floor, self.row, self.column)
    }
}

impl FromStr for SpotId {
    type Err = ParkingError;

    /// Parses the canonical form only: three dash-separated decimal
    /// integers with no sign, no spaces and no superfluous leading zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ParkingError::InvalidSpotId {
            spot_id: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(invalid("expected format floor-row-column"));
        }

        let mut coords = [0usize; 3];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("coordinates must be non-negative integers"));
            }
            if part.len() > 1 && part.starts_with('0') {
                return Err(invalid("coordinates must not have leading zeros"));
            }
            *slot = part
                .parse()
                .map_err(|_| invalid("coordinate too large"))?;
        }

        Ok(SpotId::new(coords[0], coords[1], coords[2]))
    }
}

impl Serialize for SpotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug)]
struct SpotState {
    spot_type: SpotType,
    occupant: Option<String>,
}

/// Result of [`Spot::claim`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Claimed,
    /// Another caller got there first, or the spot no longer fits
    Lost,
}

/// Point-in-time copy of a spot's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotSnapshot {
    pub id: SpotId,
    pub spot_type: SpotType,
    pub occupant: Option<String>,
}

impl SpotSnapshot {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// A single parking space
#[derive(Debug)]
pub struct Spot {
    id: SpotId,
    state: RwLock<SpotState>,
}

impl Spot {
    pub fn new(id: SpotId, spot_type: SpotType) -> Self {
        Self {
            id,
            state: RwLock::new(SpotState {
                spot_type,
                occupant: None,
            }),
        }
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn spot_type(&self) -> ParkingResult<SpotType> {
        let state = self.state.read().map_err(|_| ParkingError::poisoned())?;
        Ok(state.spot_type)
    }

    pub fn is_active(&self) -> ParkingResult<bool> {
        Ok(self.spot_type()?.is_active())
    }

    pub fn is_occupied(&self) -> ParkingResult<bool> {
        let state = self.state.read().map_err(|_| ParkingError::poisoned())?;
        Ok(state.occupant.is_some())
    }

    /// Normalized number of the occupying vehicle, if any
    pub fn vehicle_number(&self) -> ParkingResult<Option<String>> {
        let state = self.state.read().map_err(|_| ParkingError::poisoned())?;
        Ok(state.occupant.clone())
    }

    pub fn snapshot(&self) -> ParkingResult<SpotSnapshot> {
        let state = self.state.read().map_err(|_| ParkingError::poisoned())?;
        Ok(SpotSnapshot {
            id: self.id,
            spot_type: state.spot_type,
            occupant: state.occupant.clone(),
        })
    }

    /// Active, free and compatible with the vehicle type
    ///
    /// The answer may be stale as soon as it is returned; only `occupy`
    /// and `claim` decide ownership.
    pub fn can_park(&self, vehicle_type: VehicleType, policy: MatchingPolicy) -> ParkingResult<bool> {
        let state = self.state.read().map_err(|_| ParkingError::poisoned())?;
        Ok(state.occupant.is_none() && state.spot_type.accepts(vehicle_type, policy))
    }

    /// Claim the spot for a vehicle
    pub fn occupy(&self, vehicle_number: &str) -> ParkingResult<()> {
        let mut state = self.state.write().map_err(|_| ParkingError::poisoned())?;

        if !state.spot_type.is_active() {
            return Err(ParkingError::SpotInactive {
                spot_id: self.id.to_string(),
            });
        }

        if let Some(occupant) = &state.occupant {
            return Err(ParkingError::SpotAlreadyOccupied {
                spot_id: self.id.to_string(),
                occupant: occupant.clone(),
            });
        }

        let number = canonical_vehicle_number(vehicle_number)?;
        state.occupant = Some(number);
        Ok(())
    }

    /// Compare-and-claim: take the spot only if it still admits the vehicle
    ///
    /// The check and the write happen under one write lock, so a spot that
    /// was filled or retyped after a scan comes back as [`Claim::Lost`]
    /// instead of being handed to an incompatible vehicle.
    pub fn claim(
        &self,
        vehicle_type: VehicleType,
        policy: MatchingPolicy,
        vehicle_number: &str,
    ) -> ParkingResult<Claim> {
        let number = canonical_vehicle_number(vehicle_number)?;
        let mut state = self.state.write().map_err(|_| ParkingError::poisoned())?;

        if state.occupant.is_some() || !state.spot_type.accepts(vehicle_type, policy) {
            return Ok(Claim::Lost);
        }

        state.occupant = Some(number);
        Ok(Claim::Claimed)
    }

    /// Release the spot; the caller must name the occupying vehicle
    pub fn vacate(&self, vehicle_number: &str) -> ParkingResult<()> {
        let mut state = self.state.write().map_err(|_| ParkingError::poisoned())?;

        if !state.spot_type.is_active() {
            return Err(ParkingError::SpotInactive {
                spot_id: self.id.to_string(),
            });
        }

        let Some(occupant) = &state.occupant else {
            return Err(ParkingError::SpotNotOccupied {
                spot_id: self.id.to_string(),
            });
        };

        let number = normalize_vehicle_number(vehicle_number);
        if *occupant != number {
            return Err(ParkingError::VehicleMismatch {
                spot_id: self.id.to_string(),
                occupant: occupant.clone(),
                vehicle_number: number,
            });
        }

        state.occupant = None;
        Ok(())
    }

    /// Clear any occupant regardless of who it is
    ///
    /// Returns the evicted vehicle number. Administrative use only.
    pub fn force_vacate(&self) -> ParkingResult<Option<String>> {
        let mut state = self.state.write().map_err(|_| ParkingError::poisoned())?;
        Ok(state.occupant.take())
    }

    /// Change the spot type; the spot must be free
    pub(crate) fn set_spot_type(&self, spot_type: SpotType) -> ParkingResult<()> {
        let mut state = self.state.write().map_err(|_| ParkingError::poisoned())?;

        if let Some(occupant) = &state.occupant {
            return Err(ParkingError::SpotAlreadyOccupied {
                spot_id: self.id.to_string(),
                occupant: occupant.clone(),
            });
        }

        state.spot_type = spot_type;
        Ok(())
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(state) = self.state.read() else {
            return write!(f, "Spot at {} (unavailable)", self.id);
        };

        match (&state.occupant, state.spot_type.is_active()) {
            (Some(occupant), _) => write!(
                f,
                "{} at {} (Occupied by {})",
                state.spot_type.display_name(),
                self.id,
                occupant
            ),
            (None, true) => write!(f, "{} at {} (Available)", state.spot_type.display_name(), self.id),
            (None, false) => write!(f, "{} at {}", state.spot_type.display_name(), self.id),
        }
    }
}
