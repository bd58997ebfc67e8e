//! # Parking Lot
//!
//! The engine core. Owns the floors, the vehicle directory and the metrics
//! registry, and exposes park/unpark/search/available as atomic-outcome
//! operations that any number of gates may call concurrently.
//!
//! ## Park
//!
//! 1. Validate and normalize the vehicle number.
//! 2. Reserve the vehicle's directory slot (fails if already parked).
//! 3. Walk floors lowest first, row-major within a floor, over spots of
//!    the preferred type, then of each fallback type.
//! 4. Compare-and-claim each free spot under its own lock. A lost claim
//!    means another gate took the spot after it was seen free; the walk
//!    moves on. A pass that lost races without claiming anything is
//!    repeated, up to `max_park_attempts` passes.
//! 5. Commit the directory slot and open a history record, or release
//!    the reservation on failure.
//!
//! `NoSpaceAvailable` is only reported after a pass with no lost races
//! finds nothing, or a fresh scan does; `AllocationContention` when
//! every pass lost its races while spots still remained.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::config::LotConfig;
use super::directory::VehicleDirectory;
use super::errors::{ParkingError, ParkingResult};
use super::floor::{Floor, FloorClaim};
use super::history::VehicleHistory;
use super::layout::Layout;
use super::spot::{Spot, SpotId};
use super::types::{MatchingPolicy, SpotType, VehicleType};
use super::vehicle::{canonical_vehicle_number, normalize_vehicle_number};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, MetricsSnapshot};

/// Serializable point-in-time view of a lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotStatus {
    pub name: String,
    pub floors: usize,
    pub total_spots: usize,
    pub active_spots: usize,
    pub occupied_spots: usize,
    pub available_spots: usize,
    pub spot_counts: BTreeMap<SpotType, usize>,
    /// Free spots each vehicle type could take under the lot's policy
    pub available_counts: BTreeMap<VehicleType, usize>,
    pub parked_vehicles: BTreeMap<String, SpotId>,
}

/// A multi-level parking facility
#[derive(Debug)]
pub struct ParkingLot {
    name: String,
    rows: usize,
    columns: usize,
    policy: MatchingPolicy,
    max_park_attempts: usize,
    floors: Vec<Floor>,
    directory: VehicleDirectory,
    metrics: MetricsRegistry,
}

impl ParkingLot {
    /// Create a lot with strict matching and default retry budget
    pub fn create(name: &str, floors: usize, rows: usize, columns: usize) -> ParkingResult<Self> {
        Self::with_config(&LotConfig::with_dimensions(name, floors, rows, columns))
    }

    /// Create a lot from a configuration
    pub fn with_config(config: &LotConfig) -> ParkingResult<Self> {
        config.validate()?;

        let layout = Layout::generate(config.floors, config.rows, config.columns)?;
        let floors = (0..layout.floors())
            .map(|f| Floor::new(f, layout.floor(f)?))
            .collect::<ParkingResult<Vec<_>>>()?;

        let lot = Self {
            name: config.name.clone(),
            rows: config.rows,
            columns: config.columns,
            policy: config.matching_policy(),
            max_park_attempts: config.max_park_attempts,
            floors,
            directory: VehicleDirectory::new(),
            metrics: MetricsRegistry::new(),
        };

        let dimensions = format!("{}x{}x{}", config.floors, config.rows, config.columns);
        let policy = format!("{:?}", lot.policy);
        log_event_with_fields(
            Event::LotCreated,
            &[
                ("name", lot.name.as_str()),
                ("dimensions", dimensions.as_str()),
                ("policy", policy.as_str()),
            ],
        );

        Ok(lot)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> MatchingPolicy {
        self.policy
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, floor: usize) -> ParkingResult<&Floor> {
        self.floors.get(floor).ok_or(ParkingError::OutOfRange {
            axis: "floor",
            value: floor,
            limit: self.floors.len(),
        })
    }

    pub fn spot(&self, floor: usize, row: usize, column: usize) -> ParkingResult<&Spot> {
        self.floor(floor)?.spot(row, column)
    }

    /// Resolve a `"floor-row-column"` ID to its spot
    ///
    /// Malformed and out-of-range IDs both fail with `InvalidSpotId`.
    pub fn spot_by_id(&self, spot_id: &str) -> ParkingResult<&Spot> {
        let id: SpotId = spot_id.parse()?;
        self.spot(id.floor, id.row, id.column)
            .map_err(|e| ParkingError::InvalidSpotId {
                spot_id: spot_id.to_string(),
                reason: e.to_string(),
            })
    }

    // ==================
    // Allocation
    // ==================

    /// Park a vehicle and return the spot it was given
    pub fn park(&self, vehicle_type: VehicleType, vehicle_number: &str) -> ParkingResult<SpotId> {
        let result = canonical_vehicle_number(vehicle_number).and_then(|number| {
            self.reserve_and_allocate(vehicle_type, &number)
                .map(|spot_id| (number, spot_id))
        });

        match result {
            Ok((number, spot_id)) => {
                self.metrics.increment_parks();
                let id = spot_id.to_string();
                log_event_with_fields(
                    Event::VehicleParked,
                    &[
                        ("vehicle_number", number.as_str()),
                        ("vehicle_type", vehicle_type.as_str()),
                        ("spot_id", id.as_str()),
                    ],
                );
                Ok(spot_id)
            }
            Err(err) => {
                self.metrics.increment_park_failures();
                log_event_with_fields(
                    Event::ParkRejected,
                    &[
                        ("vehicle_number", vehicle_number),
                        ("vehicle_type", vehicle_type.as_str()),
                        ("code", err.code()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn reserve_and_allocate(&self, vehicle_type: VehicleType, number: &str) -> ParkingResult<SpotId> {
        self.directory.reserve(number)?;

        match self.allocate(vehicle_type, number) {
            Ok(spot_id) => {
                self.directory.commit(number, spot_id);
                Ok(spot_id)
            }
            Err(err) => {
                self.directory.release(number);
                Err(err)
            }
        }
    }

    fn allocate(&self, vehicle_type: VehicleType, number: &str) -> ParkingResult<SpotId> {
        self.allocate_with(vehicle_type, number, |_| self.claim_pass(vehicle_type, number))
    }

    /// Run up to `max_park_attempts` passes of `pass` (called with the
    /// 1-based attempt number) and settle the outcome
    fn allocate_with<P>(
        &self,
        vehicle_type: VehicleType,
        number: &str,
        mut pass: P,
    ) -> ParkingResult<SpotId>
    where
        P: FnMut(usize) -> ParkingResult<FloorClaim>,
    {
        let no_space = || ParkingError::NoSpaceAvailable {
            vehicle_type: vehicle_type.to_string(),
        };

        for attempt in 1..=self.max_park_attempts {
            let FloorClaim { spot_id, races_lost } = pass(attempt)?;

            if races_lost > 0 {
                self.record_races_lost(number, attempt, races_lost);
            }

            match spot_id {
                Some(spot_id) => return Ok(spot_id),
                // Nothing free and nobody beat us to anything: the lot is full
                None if races_lost == 0 => return Err(no_space()),
                None => {}
            }
        }

        // Every pass lost its races; distinguish a lot that filled up
        // meanwhile from one where spots were freed behind the scan.
        if self.find_candidate(vehicle_type)?.is_none() {
            return Err(no_space());
        }

        Err(ParkingError::AllocationContention {
            vehicle_type: vehicle_type.to_string(),
            attempts: self.max_park_attempts,
        })
    }

    /// One walk over compatible types, then floors, claiming the first
    /// free spot that is still free when its lock is taken
    fn claim_pass(&self, vehicle_type: VehicleType, number: &str) -> ParkingResult<FloorClaim> {
        let mut races_lost = 0;

        for spot_type in vehicle_type.compatible_spot_types(self.policy) {
            for floor in &self.floors {
                let claim = floor.claim_first(vehicle_type, *spot_type, self.policy, number)?;
                races_lost += claim.races_lost;
                if claim.spot_id.is_some() {
                    return Ok(FloorClaim {
                        spot_id: claim.spot_id,
                        races_lost,
                    });
                }
            }
        }

        Ok(FloorClaim {
            spot_id: None,
            races_lost,
        })
    }

    fn record_races_lost(&self, number: &str, attempt: usize, races_lost: usize) {
        self.metrics.add_races_lost(races_lost as u64);
        let attempt = attempt.to_string();
        let races_lost = races_lost.to_string();
        log_event_with_fields(
            Event::ParkRaceLost,
            &[
                ("vehicle_number", number),
                ("attempt", attempt.as_str()),
                ("races_lost", races_lost.as_str()),
            ],
        );
    }

    /// First free compatible spot: preferred type before fallbacks, then
    /// lowest floor, row and column
    fn find_candidate(&self, vehicle_type: VehicleType) -> ParkingResult<Option<&Spot>> {
        for spot_type in vehicle_type.compatible_spot_types(self.policy) {
            for floor in &self.floors {
                if let Some(spot) = floor.first_available(vehicle_type, *spot_type, self.policy)? {
                    return Ok(Some(spot));
                }
            }
        }
        Ok(None)
    }

    /// Remove a vehicle from the spot it is parked in
    pub fn unpark(&self, spot_id: &str, vehicle_number: &str) -> ParkingResult<()> {
        let number = canonical_vehicle_number(vehicle_number)?;

        let checkout = self.directory.check_out(&number, |recorded| {
            if recorded.to_string() != spot_id {
                return Err(ParkingError::InvalidOperation {
                    operation: "unpark",
                    reason: format!(
                        "vehicle {} is parked at spot {}, not {}",
                        number, recorded, spot_id
                    ),
                });
            }

            self.spot_by_id(spot_id)?
                .vacate(&number)
                .map_err(|e| ParkingError::VacationError {
                    spot_id: spot_id.to_string(),
                    source: Box::new(e),
                })
        })?;

        self.metrics.increment_unparks();

        let spot_id = checkout.spot_id.to_string();
        if checkout.record.is_none() {
            log_event_with_fields(
                Event::HistoryInconsistent,
                &[
                    ("vehicle_number", number.as_str()),
                    ("spot_id", spot_id.as_str()),
                    ("reason", "no open parking record"),
                ],
            );
        }

        log_event_with_fields(
            Event::VehicleUnparked,
            &[("vehicle_number", number.as_str()), ("spot_id", spot_id.as_str())],
        );

        Ok(())
    }

    // ==================
    // Queries
    // ==================

    /// IDs of every spot the vehicle type could take now, lowest floor
    /// first and row-major within a floor
    pub fn available_spot(&self, vehicle_type: VehicleType) -> ParkingResult<Vec<SpotId>> {
        let mut ids = Vec::new();
        for floor in &self.floors {
            ids.extend(
                floor
                    .available_spots(vehicle_type, self.policy)?
                    .into_iter()
                    .map(Spot::id),
            );
        }
        Ok(ids)
    }

    /// Current spot and `true`, or last known spot and `false`
    pub fn search_vehicle(&self, vehicle_number: &str) -> ParkingResult<(SpotId, bool)> {
        let number = canonical_vehicle_number(vehicle_number)?;

        if let Some(spot_id) = self.directory.spot_of(&number) {
            return Ok((spot_id, true));
        }

        self.directory
            .last_spot(&number)
            .map(|spot_id| (spot_id, false))
            .ok_or(ParkingError::VehicleNotFound {
                vehicle_number: number,
            })
    }

    /// Spot of a currently parked vehicle
    pub fn find_vehicle(&self, vehicle_number: &str) -> ParkingResult<SpotId> {
        match self.search_vehicle(vehicle_number)? {
            (spot_id, true) => Ok(spot_id),
            (last, false) => Err(ParkingError::InvalidOperation {
                operation: "find_vehicle",
                reason: format!(
                    "vehicle is not currently parked, last seen at spot {}",
                    last
                ),
            }),
        }
    }

    pub fn is_vehicle_parked(&self, vehicle_number: &str) -> bool {
        self.directory
            .is_parked(&normalize_vehicle_number(vehicle_number))
    }

    /// Snapshot of normalized number → spot for every parked vehicle
    pub fn all_parked_vehicles(&self) -> BTreeMap<String, SpotId> {
        self.directory.parked_vehicles()
    }

    pub fn parked_vehicle_count(&self) -> usize {
        self.directory.parked_count()
    }

    /// Copy of a vehicle's parking history
    pub fn vehicle_history(&self, vehicle_number: &str) -> ParkingResult<VehicleHistory> {
        let number = canonical_vehicle_number(vehicle_number)?;
        self.directory
            .history(&number)
            .ok_or(ParkingError::VehicleNotFound {
                vehicle_number: number,
            })
    }

    pub fn total_spot_count(&self) -> usize {
        self.floors.iter().map(Floor::spot_count).sum()
    }

    pub fn active_spot_count(&self) -> ParkingResult<usize> {
        self.sum_floors(Floor::active_spot_count)
    }

    pub fn occupied_spot_count(&self) -> ParkingResult<usize> {
        self.sum_floors(Floor::occupied_spot_count)
    }

    /// Active minus occupied
    pub fn available_spot_count(&self) -> ParkingResult<usize> {
        let active = self.active_spot_count()?;
        let occupied = self.occupied_spot_count()?;
        Ok(active.saturating_sub(occupied))
    }

    pub fn spot_count_by_type(&self) -> ParkingResult<BTreeMap<SpotType, usize>> {
        let mut counts: BTreeMap<SpotType, usize> = SpotType::ALL.iter().map(|t| (*t, 0)).collect();
        for floor in &self.floors {
            for (spot_type, n) in floor.spot_count_by_type()? {
                *counts.entry(spot_type).or_insert(0) += n;
            }
        }
        Ok(counts)
    }

    /// Free spots each vehicle type could take under the lot's policy
    pub fn available_spot_count_by_type(&self) -> ParkingResult<BTreeMap<VehicleType, usize>> {
        let mut counts = BTreeMap::new();
        for vehicle_type in VehicleType::ALL {
            let mut n = 0;
            for floor in &self.floors {
                n += floor.available_spots(vehicle_type, self.policy)?.len();
            }
            counts.insert(vehicle_type, n);
        }
        Ok(counts)
    }

    fn sum_floors(&self, count: impl Fn(&Floor) -> ParkingResult<usize>) -> ParkingResult<usize> {
        let mut total = 0;
        for floor in &self.floors {
            total += count(floor)?;
        }
        Ok(total)
    }

    pub fn status(&self) -> ParkingResult<LotStatus> {
        let active_spots = self.active_spot_count()?;
        let occupied_spots = self.occupied_spot_count()?;

        Ok(LotStatus {
            name: self.name.clone(),
            floors: self.floors.len(),
            total_spots: self.total_spot_count(),
            active_spots,
            occupied_spots,
            available_spots: active_spots.saturating_sub(occupied_spots),
            spot_counts: self.spot_count_by_type()?,
            available_counts: self.available_spot_count_by_type()?,
            parked_vehicles: self.all_parked_vehicles(),
        })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // ==================
    // Administration
    // ==================

    /// Change the type of a free spot
    pub fn set_spot_type(&self, spot_id: &str, spot_type: SpotType) -> ParkingResult<()> {
        let id = self.spot_by_id(spot_id)?.id();
        self.floor(id.floor)?.set_spot_type(id.row, id.column, spot_type)?;

        log_event_with_fields(
            Event::SpotRetyped,
            &[("spot_id", spot_id), ("spot_type", spot_type.code())],
        );
        Ok(())
    }

    /// Evict every vehicle and forget all history
    ///
    /// Must not race with park or unpark.
    pub fn reset(&self) -> ParkingResult<()> {
        let mut evicted = 0;
        for floor in &self.floors {
            evicted += floor.force_vacate_all()?.len();
        }
        self.directory.clear();

        self.metrics.increment_resets();
        let evicted = evicted.to_string();
        log_event_with_fields(Event::LotReset, &[("evicted", evicted.as_str())]);
        Ok(())
    }
}

impl fmt::Display for ParkingLot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active_spot_count().map_err(|_| fmt::Error)?;
        let occupied = self.occupied_spot_count().map_err(|_| fmt::Error)?;
        write!(
            f,
            "{}: {} floors, {} total spots, {} active, {} occupied, {} available",
            self.name,
            self.floors.len(),
            self.total_spot_count(),
            active,
            occupied,
            active.saturating_sub(occupied)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot_2x3x4() -> ParkingLot {
        ParkingLot::create("T", 2, 3, 4).unwrap()
    }

    #[test]
    fn test_create_rejects_bad_dimensions() {
        let err = ParkingLot::create("T", 0, 3, 4).unwrap_err();
        assert_eq!(err.code(), "INVALID_DIMENSIONS");
        assert!(ParkingLot::create("T", 1, 1001, 4).is_err());
    }

    #[test]
    fn test_park_takes_first_spot_row_major() {
        let lot = lot_2x3x4();
        assert_eq!(lot.park(VehicleType::Automobile, "A1").unwrap().to_string(), "0-0-2");
        assert_eq!(lot.park(VehicleType::Automobile, "A2").unwrap().to_string(), "0-0-3");
        assert_eq!(lot.park(VehicleType::Bicycle, "B1").unwrap().to_string(), "0-1-0");
        assert_eq!(lot.park(VehicleType::Bicycle, "B2").unwrap().to_string(), "0-2-0");
        assert_eq!(lot.park(VehicleType::Bicycle, "B3").unwrap().to_string(), "1-1-0");
    }

    #[test]
    fn test_park_stores_normalized_number() {
        let lot = lot_2x3x4();
        let spot_id = lot.park(VehicleType::Motorcycle, "ka-01   hh").unwrap();
        assert!(lot.is_vehicle_parked("KA-01 HH"));
        assert_eq!(
            lot.spot_by_id(&spot_id.to_string()).unwrap().vehicle_number().unwrap().as_deref(),
            Some("KA-01 HH")
        );
    }

    #[test]
    fn test_park_rejects_invalid_number() {
        let lot = lot_2x3x4();
        let err = lot.park(VehicleType::Automobile, "#bad").unwrap_err();
        assert_eq!(err.code(), "INVALID_VEHICLE_NUMBER");
        assert_eq!(lot.metrics().park_failures, 1);

        // Validation sees the raw input, before trimming
        let err = lot.park(VehicleType::Automobile, "  ka-01 ").unwrap_err();
        assert_eq!(err.code(), "INVALID_VEHICLE_NUMBER");
        assert_eq!(lot.parked_vehicle_count(), 0);
    }

    #[test]
    fn test_failed_park_releases_reservation() {
        let lot = ParkingLot::create("T", 1, 2, 2).unwrap();
        lot.park(VehicleType::Bicycle, "B1").unwrap();
        assert_eq!(
            lot.park(VehicleType::Bicycle, "B2").unwrap_err().code(),
            "NO_SPACE_AVAILABLE"
        );

        lot.unpark("0-0-0", "B1").unwrap();
        assert_eq!(lot.park(VehicleType::Bicycle, "B2").unwrap().to_string(), "0-0-0");
    }

    #[test]
    fn test_hierarchical_fallback_prefers_own_type() {
        let config = LotConfig {
            strict_matching: false,
            ..LotConfig::with_dimensions("H", 1, 2, 2)
        };
        let lot = ParkingLot::with_config(&config).unwrap();
        assert_eq!(lot.policy(), MatchingPolicy::Hierarchical);

        // 1x2x2 layout: B M / A A
        assert_eq!(lot.park(VehicleType::Bicycle, "B1").unwrap().to_string(), "0-0-0");
        assert_eq!(lot.park(VehicleType::Bicycle, "B2").unwrap().to_string(), "0-0-1");
        assert_eq!(lot.park(VehicleType::Bicycle, "B3").unwrap().to_string(), "0-1-0");
        assert_eq!(lot.park(VehicleType::Automobile, "A1").unwrap().to_string(), "0-1-1");
        assert!(lot.park(VehicleType::Bicycle, "B4").unwrap_err().is_capacity());
    }

    #[test]
    fn test_unpark_wrong_spot_is_invalid_operation() {
        let lot = lot_2x3x4();
        lot.park(VehicleType::Automobile, "A1").unwrap();

        let err = lot.unpark("0-0-3", "A1").unwrap_err();
        assert_eq!(err.code(), "INVALID_OPERATION");
        let err = lot.unpark("wrong-spot-id", "A1").unwrap_err();
        assert_eq!(err.code(), "INVALID_OPERATION");
        assert!(lot.is_vehicle_parked("A1"));
    }

    #[test]
    fn test_unpark_unknown_vehicle() {
        let lot = lot_2x3x4();
        assert!(lot.unpark("0-0-2", "NOBODY").unwrap_err().is_not_found());
        assert_eq!(
            lot.unpark("0-0-2", "").unwrap_err().code(),
            "INVALID_VEHICLE_NUMBER"
        );
    }

    #[test]
    fn test_unpark_closes_history() {
        let lot = lot_2x3x4();
        lot.park(VehicleType::Automobile, "A1").unwrap();
        lot.unpark("0-0-2", "a1").unwrap();

        let history = lot.vehicle_history("A1").unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history.is_currently_parked());
        assert_eq!(lot.metrics().unparks, 1);
    }

    #[test]
    fn test_unpark_without_open_record_still_succeeds() {
        let lot = lot_2x3x4();
        lot.park(VehicleType::Automobile, "A1").unwrap();
        lot.directory.close_history("A1");

        lot.unpark("0-0-2", "A1").unwrap();
        assert!(!lot.is_vehicle_parked("A1"));
        assert!(!lot.spot_by_id("0-0-2").unwrap().is_occupied().unwrap());
        assert_eq!(lot.metrics().unparks, 1);
        assert_eq!(lot.search_vehicle("A1").unwrap(), (SpotId::new(0, 0, 2), false));
    }

    // ==================
    // Allocation passes
    // ==================

    #[test]
    fn test_allocate_retries_after_lost_race() {
        let lot = lot_2x3x4();
        let spot_id = lot
            .allocate_with(VehicleType::Automobile, "A1", |attempt| {
                if attempt == 1 {
                    // Another gate takes the first candidate mid-pass
                    lot.spot_by_id("0-0-2")?.occupy("RIVAL")?;
                    return Ok(FloorClaim {
                        spot_id: None,
                        races_lost: 1,
                    });
                }
                lot.claim_pass(VehicleType::Automobile, "A1")
            })
            .unwrap();

        assert_eq!(spot_id.to_string(), "0-0-3");
        assert_eq!(lot.metrics().races_lost, 1);
        assert_eq!(
            lot.spot_by_id("0-0-3").unwrap().vehicle_number().unwrap().as_deref(),
            Some("A1")
        );
    }

    #[test]
    fn test_allocate_contention_when_spots_remain() {
        let lot = lot_2x3x4();
        let mut passes = 0;
        let err = lot
            .allocate_with(VehicleType::Automobile, "A1", |_| {
                passes += 1;
                Ok(FloorClaim {
                    spot_id: None,
                    races_lost: 2,
                })
            })
            .unwrap_err();

        assert_eq!(passes, 3);
        assert_eq!(
            err,
            ParkingError::AllocationContention {
                vehicle_type: VehicleType::Automobile.to_string(),
                attempts: 3,
            }
        );
        assert!(err.is_capacity());
        assert_eq!(lot.metrics().races_lost, 6);
    }

    #[test]
    fn test_allocate_no_space_once_lot_fills_behind_scan() {
        let fill = |lot: &ParkingLot| -> ParkingResult<()> {
            for (i, id) in lot.available_spot(VehicleType::Automobile)?.iter().enumerate() {
                lot.spot_by_id(&id.to_string())?.occupy(&format!("RIVAL-{i}"))?;
            }
            Ok(())
        };

        // Every pass loses: the fresh scan finds nothing free
        let lot = lot_2x3x4();
        let err = lot
            .allocate_with(VehicleType::Automobile, "A1", |attempt| {
                if attempt == 1 {
                    fill(&lot)?;
                }
                Ok(FloorClaim {
                    spot_id: None,
                    races_lost: 1,
                })
            })
            .unwrap_err();
        assert_eq!(err.code(), "NO_SPACE_AVAILABLE");
        assert_eq!(lot.metrics().races_lost, 3);

        // A clean pass after a lost one settles it without using the budget
        let lot = lot_2x3x4();
        let mut passes = 0;
        let err = lot
            .allocate_with(VehicleType::Automobile, "A1", |attempt| {
                passes += 1;
                if attempt == 1 {
                    fill(&lot)?;
                    return Ok(FloorClaim {
                        spot_id: None,
                        races_lost: 1,
                    });
                }
                lot.claim_pass(VehicleType::Automobile, "A1")
            })
            .unwrap_err();
        assert_eq!(err.code(), "NO_SPACE_AVAILABLE");
        assert_eq!(passes, 2);
        assert_eq!(lot.metrics().races_lost, 1);
    }

    #[test]
    fn test_spot_by_id() {
        let lot = lot_2x3x4();
        assert_eq!(lot.spot_by_id("1-2-3").unwrap().id(), SpotId::new(1, 2, 3));
        assert_eq!(lot.spot_by_id("2-0-0").unwrap_err().code(), "INVALID_SPOT_ID");
        assert_eq!(lot.spot_by_id("0-3-0").unwrap_err().code(), "INVALID_SPOT_ID");
        assert_eq!(lot.spot_by_id("0-0").unwrap_err().code(), "INVALID_SPOT_ID");
        assert_eq!(lot.floor(2).unwrap_err().code(), "OUT_OF_RANGE");
    }

    #[test]
    fn test_search_and_find() {
        let lot = lot_2x3x4();
        assert!(lot.search_vehicle("A1").unwrap_err().is_not_found());

        let spot_id = lot.park(VehicleType::Automobile, "A1").unwrap();
        assert_eq!(lot.search_vehicle("a1").unwrap(), (spot_id, true));
        assert_eq!(lot.find_vehicle("A1").unwrap(), spot_id);

        lot.unpark(&spot_id.to_string(), "A1").unwrap();
        assert_eq!(lot.search_vehicle("A1").unwrap(), (spot_id, false));
        assert_eq!(lot.find_vehicle("A1").unwrap_err().code(), "INVALID_OPERATION");
    }

    #[test]
    fn test_counts() {
        let lot = lot_2x3x4();
        assert_eq!(lot.total_spot_count(), 24);
        assert_eq!(lot.active_spot_count().unwrap(), 20);
        assert_eq!(lot.available_spot_count().unwrap(), 20);

        lot.park(VehicleType::Motorcycle, "M1").unwrap();
        assert_eq!(lot.occupied_spot_count().unwrap(), 1);
        assert_eq!(lot.available_spot_count().unwrap(), 19);

        let available = lot.available_spot_count_by_type().unwrap();
        assert_eq!(available[&VehicleType::Bicycle], 4);
        assert_eq!(available[&VehicleType::Motorcycle], 3);
        assert_eq!(available[&VehicleType::Automobile], 12);
    }

    #[test]
    fn test_available_spot_lists_ids_in_order() {
        let lot = lot_2x3x4();
        let ids: Vec<String> = lot
            .available_spot(VehicleType::Bicycle)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, vec!["0-1-0", "0-2-0", "1-1-0", "1-2-0"]);
    }

    #[test]
    fn test_set_spot_type() {
        let lot = lot_2x3x4();
        lot.set_spot_type("0-0-0", SpotType::Bicycle).unwrap();
        assert_eq!(lot.park(VehicleType::Bicycle, "B1").unwrap().to_string(), "0-0-0");

        let err = lot.set_spot_type("0-0-0", SpotType::Inactive).unwrap_err();
        assert_eq!(err.code(), "SPOT_ALREADY_OCCUPIED");
        assert_eq!(lot.spot_count_by_type().unwrap()[&SpotType::Bicycle], 5);
    }

    #[test]
    fn test_reset_clears_everything() {
        let lot = lot_2x3x4();
        lot.park(VehicleType::Automobile, "A1").unwrap();
        lot.park(VehicleType::Bicycle, "B1").unwrap();

        lot.reset().unwrap();
        assert_eq!(lot.occupied_spot_count().unwrap(), 0);
        assert_eq!(lot.parked_vehicle_count(), 0);
        assert!(lot.search_vehicle("A1").unwrap_err().is_not_found());
        assert_eq!(lot.metrics().resets, 1);

        assert_eq!(lot.park(VehicleType::Automobile, "A1").unwrap().to_string(), "0-0-2");
    }

    #[test]
    fn test_status_and_display() {
        let lot = lot_2x3x4();
        lot.park(VehicleType::Automobile, "A1").unwrap();

        let status = lot.status().unwrap();
        assert_eq!(status.total_spots, 24);
        assert_eq!(status.occupied_spots, 1);
        assert_eq!(status.available_spots, 19);
        assert_eq!(status.parked_vehicles["A1"], SpotId::new(0, 0, 2));

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["spot_counts"]["BICYCLE"], 4);
        assert_eq!(json["parked_vehicles"]["A1"], "0-0-2");

        assert_eq!(
            lot.to_string(),
            "T: 2 floors, 24 total spots, 20 active, 1 occupied, 19 available"
        );
    }
}
