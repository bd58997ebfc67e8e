//! # Vehicle History
//!
//! Append-only timeline of parking intervals per vehicle. At most the last
//! record may be open (no unpark time yet).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{ParkingError, ParkingResult};
use super::spot::SpotId;

/// One parking interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingRecord {
    pub spot_id: SpotId,
    pub parked_at: DateTime<Utc>,
    pub unparked_at: Option<DateTime<Utc>>,
}

impl ParkingRecord {
    pub fn new(spot_id: SpotId) -> Self {
        Self {
            spot_id,
            parked_at: Utc::now(),
            unparked_at: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unparked_at.is_some()
    }

    /// Time parked so far, or in total once complete
    pub fn duration(&self) -> Duration {
        self.unparked_at.unwrap_or_else(Utc::now) - self.parked_at
    }
}

/// Parking timeline of one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleHistory {
    /// Normalized vehicle number
    pub vehicle_number: String,
    pub records: Vec<ParkingRecord>,
}

impl VehicleHistory {
    pub fn new(vehicle_number: impl Into<String>) -> Self {
        Self {
            vehicle_number: vehicle_number.into(),
            records: Vec::new(),
        }
    }

    /// Open a new record at `spot_id`
    pub fn record_park(&mut self, spot_id: SpotId) {
        self.records.push(ParkingRecord::new(spot_id));
    }

    /// Close the most recent record
    pub fn complete_last(&mut self) -> ParkingResult<&ParkingRecord> {
        let Some(last) = self.records.last_mut() else {
            return Err(ParkingError::InvalidOperation {
                operation: "complete_record",
                reason: format!("no parking records exist for {}", self.vehicle_number),
            });
        };

        if last.is_complete() {
            return Err(ParkingError::InvalidOperation {
                operation: "complete_record",
                reason: format!("last record for {} is already complete", self.vehicle_number),
            });
        }

        last.unparked_at = Some(Utc::now());
        Ok(last)
    }

    pub fn last_record(&self) -> Option<&ParkingRecord> {
        self.records.last()
    }

    pub fn is_currently_parked(&self) -> bool {
        self.last_record().is_some_and(|r| !r.is_complete())
    }

    /// Spot of the open record, if any
    pub fn current_spot_id(&self) -> Option<SpotId> {
        self.last_record()
            .filter(|r| !r.is_complete())
            .map(|r| r.spot_id)
    }

    /// Spot of the most recent record, open or not
    pub fn last_spot_id(&self) -> Option<SpotId> {
        self.last_record().map(|r| r.spot_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
