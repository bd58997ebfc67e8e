//! # Vehicle Directory
//!
//! Live map of parked vehicles plus their parking histories, both keyed by
//! normalized vehicle number and sharded so that different vehicles never
//! block each other.
//!
//! A park first *reserves* the vehicle's directory slot, then allocates a
//! spot, then commits. The reservation makes "check not parked" and
//! "record parked" one linearizable step per vehicle without holding any
//! lock during the spot scan.
//!
//! Lock order: a `parked` shard may be held while taking a `history` shard
//! or a spot lock, never the other way round.

use std::collections::BTreeMap;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::errors::{ParkingError, ParkingResult};
use super::history::{ParkingRecord, VehicleHistory};
use super::spot::SpotId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// A park for this vehicle is allocating a spot
    Reserved,
    Parked(SpotId),
}

/// Outcome of [`VehicleDirectory::check_out`]
#[derive(Debug, Clone)]
pub struct CheckOut {
    pub spot_id: SpotId,
    /// Closed history record; `None` when the history had no open record
    pub record: Option<ParkingRecord>,
}

/// Concurrent vehicle → spot directory with per-vehicle history
#[derive(Debug, Default)]
pub struct VehicleDirectory {
    parked: DashMap<String, Slot>,
    history: DashMap<String, VehicleHistory>,
}

impl VehicleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the directory slot for a vehicle about to be parked
    pub fn reserve(&self, number: &str) -> ParkingResult<()> {
        match self.parked.entry(number.to_string()) {
            Entry::Occupied(e) => match *e.get() {
                Slot::Parked(spot_id) => Err(ParkingError::VehicleAlreadyParked {
                    vehicle_number: number.to_string(),
                    spot_id: spot_id.to_string(),
                }),
                Slot::Reserved => Err(ParkingError::InvalidOperation {
                    operation: "park",
                    reason: format!("a park for vehicle {} is already in progress", number),
                }),
            },
            Entry::Vacant(e) => {
                e.insert(Slot::Reserved);
                Ok(())
            }
        }
    }

    /// Drop a reservation that did not lead to a park
    pub fn release(&self, number: &str) {
        self.parked
            .remove_if(number, |_, slot| *slot == Slot::Reserved);
    }

    /// Turn a reservation into a parked entry and open a history record
    pub fn commit(&self, number: &str, spot_id: SpotId) {
        let mut slot = self.parked.entry(number.to_string()).or_insert(Slot::Reserved);
        *slot = Slot::Parked(spot_id);

        self.history
            .entry(number.to_string())
            .or_insert_with(|| VehicleHistory::new(number))
            .record_park(spot_id);
    }

    /// Remove a parked vehicle
    ///
    /// `release` runs while the vehicle's slot is held, so no concurrent
    /// park or unpark of the same vehicle can interleave. The entry is
    /// removed only if `release` succeeds.
    pub fn check_out<F>(&self, number: &str, release: F) -> ParkingResult<CheckOut>
    where
        F: FnOnce(SpotId) -> ParkingResult<()>,
    {
        let not_found = || ParkingError::VehicleNotFound {
            vehicle_number: number.to_string(),
        };

        let Entry::Occupied(entry) = self.parked.entry(number.to_string()) else {
            return Err(not_found());
        };
        let Slot::Parked(spot_id) = *entry.get() else {
            return Err(not_found());
        };

        release(spot_id)?;

        let mut record = None;
        if let Some(mut history) = self.history.get_mut(number) {
            record = history.complete_last().ok().cloned();
        }
        entry.remove();

        Ok(CheckOut { spot_id, record })
    }

    /// Current spot of a parked vehicle
    pub fn spot_of(&self, number: &str) -> Option<SpotId> {
        match self.parked.get(number).map(|slot| *slot) {
            Some(Slot::Parked(spot_id)) => Some(spot_id),
            _ => None,
        }
    }

    pub fn is_parked(&self, number: &str) -> bool {
        self.spot_of(number).is_some()
    }

    /// Number of vehicles currently parked (reservations excluded)
    pub fn parked_count(&self) -> usize {
        self.parked
            .iter()
            .filter(|e| matches!(e.value(), Slot::Parked(_)))
            .count()
    }

    /// Snapshot of every parked vehicle, ordered by number
    pub fn parked_vehicles(&self) -> BTreeMap<String, SpotId> {
        self.parked
            .iter()
            .filter_map(|e| match *e.value() {
                Slot::Parked(spot_id) => Some((e.key().clone(), spot_id)),
                Slot::Reserved => None,
            })
            .collect()
    }

    /// Copy of a vehicle's history
    pub fn history(&self, number: &str) -> Option<VehicleHistory> {
        self.history.get(number).map(|h| h.value().clone())
    }

    /// Spot of the most recent record, open or not
    pub fn last_spot(&self, number: &str) -> Option<SpotId> {
        self.history.get(number).and_then(|h| h.last_spot_id())
    }

    /// Forget every vehicle and all history
    pub fn clear(&self) {
        self.parked.clear();
        self.history.clear();
    }

    /// Close the open history record without checking the vehicle out
    #[cfg(test)]
    pub(crate) fn close_history(&self, number: &str) {
        if let Some(mut history) = self.history.get_mut(number) {
            let _ = history.complete_last();
        }
    }
}
