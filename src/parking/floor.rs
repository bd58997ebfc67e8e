//! # Parking Floor
//!
//! A fixed-shape grid of spots. Scans and aggregate counts hold the floor
//! read lock; re-typing a spot holds the write lock so counts by type never
//! observe a half-applied change. Occupancy changes go through the spots'
//! own locks and never touch the floor lock.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard};

use super::errors::{ParkingError, ParkingResult};
use super::spot::{Claim, Spot, SpotId, SpotSnapshot};
use super::types::{MatchingPolicy, SpotType, VehicleType};
use super::vehicle::normalize_vehicle_number;

/// Outcome of [`Floor::claim_first`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorClaim {
    pub spot_id: Option<SpotId>,
    /// Spots seen free that another gate claimed first
    pub races_lost: usize,
}

/// One level of the lot
#[derive(Debug)]
pub struct Floor {
    number: usize,
    rows: usize,
    columns: usize,
    /// Row-major
    spots: Vec<Spot>,
    scan_lock: RwLock<()>,
}

impl Floor {
    /// Build a floor from its row-major spot type grid
    pub fn new(number: usize, spot_types: &[Vec<SpotType>]) -> ParkingResult<Self> {
        let rows = spot_types.len();
        let columns = spot_types.first().map(Vec::len).unwrap_or(0);

        if rows == 0 || columns == 0 {
            return Err(ParkingError::InvalidOperation {
                operation: "create_floor",
                reason: "floor must have at least one row and one column".into(),
            });
        }

        if let Some(bad) = spot_types.iter().position(|r| r.len() != columns) {
            return Err(ParkingError::InvalidOperation {
                operation: "create_floor",
                reason: format!(
                    "row {} has {} columns, expected {}",
                    bad,
                    spot_types[bad].len(),
                    columns
                ),
            });
        }

        let spots = spot_types
            .iter()
            .enumerate()
            .flat_map(|(r, cols)| {
                cols.iter()
                    .enumerate()
                    .map(move |(c, t)| Spot::new(SpotId::new(number, r, c), *t))
            })
            .collect();

        Ok(Self {
            number,
            rows,
            columns,
            spots,
            scan_lock: RwLock::new(()),
        })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Spot at (row, column), bounds-checked
    pub fn spot(&self, row: usize, column: usize) -> ParkingResult<&Spot> {
        if row >= self.rows {
            return Err(ParkingError::OutOfRange {
                axis: "row",
                value: row,
                limit: self.rows,
            });
        }
        if column >= self.columns {
            return Err(ParkingError::OutOfRange {
                axis: "column",
                value: column,
                limit: self.columns,
            });
        }
        Ok(&self.spots[row * self.columns + column])
    }

    fn read_scan(&self) -> ParkingResult<RwLockReadGuard<'_, ()>> {
        self.scan_lock.read().map_err(|_| ParkingError::poisoned())
    }

    /// Spots that currently admit the vehicle type, row-major
    pub fn available_spots(
        &self,
        vehicle_type: VehicleType,
        policy: MatchingPolicy,
    ) -> ParkingResult<Vec<&Spot>> {
        let _guard = self.read_scan()?;
        let mut available = Vec::new();
        for spot in &self.spots {
            if spot.can_park(vehicle_type, policy)? {
                available.push(spot);
            }
        }
        Ok(available)
    }

    /// First spot of exactly `spot_type` that admits the vehicle, row-major
    pub fn first_available(
        &self,
        vehicle_type: VehicleType,
        spot_type: SpotType,
        policy: MatchingPolicy,
    ) -> ParkingResult<Option<&Spot>> {
        let _guard = self.read_scan()?;
        for spot in &self.spots {
            if spot.spot_type()? == spot_type && spot.can_park(vehicle_type, policy)? {
                return Ok(Some(spot));
            }
        }
        Ok(None)
    }

    /// Claim the first free spot of exactly `spot_type`, row-major
    ///
    /// A spot that is taken between the check and the claim counts as a
    /// lost race and the walk moves on to the next spot.
    pub fn claim_first(
        &self,
        vehicle_type: VehicleType,
        spot_type: SpotType,
        policy: MatchingPolicy,
        vehicle_number: &str,
    ) -> ParkingResult<FloorClaim> {
        let _guard = self.read_scan()?;
        let mut races_lost = 0;

        for spot in &self.spots {
            if spot.spot_type()? != spot_type || !spot.can_park(vehicle_type, policy)? {
                continue;
            }
            match spot.claim(vehicle_type, policy, vehicle_number)? {
                Claim::Claimed => {
                    return Ok(FloorClaim {
                        spot_id: Some(spot.id()),
                        races_lost,
                    })
                }
                Claim::Lost => races_lost += 1,
            }
        }

        Ok(FloorClaim {
            spot_id: None,
            races_lost,
        })
    }

    pub fn spot_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn active_spot_count(&self) -> ParkingResult<usize> {
        self.count_where(|spot| spot.is_active())
    }

    pub fn occupied_spot_count(&self) -> ParkingResult<usize> {
        self.count_where(|spot| spot.is_occupied())
    }

    /// Spots of each type; every type is present as a key
    pub fn spot_count_by_type(&self) -> ParkingResult<BTreeMap<SpotType, usize>> {
        let _guard = self.read_scan()?;
        let mut counts: BTreeMap<SpotType, usize> = SpotType::ALL.iter().map(|t| (*t, 0)).collect();
        for spot in &self.spots {
            *counts.entry(spot.spot_type()?).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn count_where(&self, pred: impl Fn(&Spot) -> ParkingResult<bool>) -> ParkingResult<usize> {
        let _guard = self.read_scan()?;
        let mut count = 0;
        for spot in &self.spots {
            if pred(spot)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Spot holding the vehicle on this floor, if any
    pub fn find_vehicle(&self, vehicle_number: &str) -> ParkingResult<Option<&Spot>> {
        let number = normalize_vehicle_number(vehicle_number);
        let _guard = self.read_scan()?;
        for spot in &self.spots {
            if spot.vehicle_number()?.as_deref() == Some(number.as_str()) {
                return Ok(Some(spot));
            }
        }
        Ok(None)
    }

    /// Copy of every spot's state, row-major
    pub fn snapshot(&self) -> ParkingResult<Vec<SpotSnapshot>> {
        let _guard = self.read_scan()?;
        self.spots.iter().map(Spot::snapshot).collect()
    }

    /// Current spot types, `[row][column]`
    pub fn layout(&self) -> ParkingResult<Vec<Vec<SpotType>>> {
        let _guard = self.read_scan()?;
        let mut grid = Vec::with_capacity(self.rows);
        for row in self.spots.chunks(self.columns) {
            grid.push(row.iter().map(Spot::spot_type).collect::<ParkingResult<Vec<_>>>()?);
        }
        Ok(grid)
    }

    /// One string per row: `B`/`M`/`A` free, `b`/`m`/`a` occupied, `X` inactive
    pub fn display_state(&self) -> ParkingResult<Vec<String>> {
        let _guard = self.read_scan()?;
        let mut lines = Vec::with_capacity(self.rows);
        for row in self.spots.chunks(self.columns) {
            let mut line = String::with_capacity(self.columns);
            for spot in row {
                let snap = spot.snapshot()?;
                line.push(snap.spot_type.symbol(snap.is_occupied()));
            }
            lines.push(line);
        }
        Ok(lines)
    }

    /// Retype a free spot under the floor write lock
    pub fn set_spot_type(&self, row: usize, column: usize, spot_type: SpotType) -> ParkingResult<()> {
        let spot = self.spot(row, column)?;
        let _guard = self.scan_lock.write().map_err(|_| ParkingError::poisoned())?;
        spot.set_spot_type(spot_type)
    }

    /// Evict every occupant; returns the evicted vehicle numbers
    pub(crate) fn force_vacate_all(&self) -> ParkingResult<Vec<String>> {
        let _guard = self.read_scan()?;
        let mut evicted = Vec::new();
        for spot in &self.spots {
            if let Some(number) = spot.force_vacate()? {
                evicted.push(number);
            }
        }
        Ok(evicted)
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active_spot_count().map_err(|_| fmt::Error)?;
        let occupied = self.occupied_spot_count().map_err(|_| fmt::Error)?;
        write!(
            f,
            "Floor {} ({}x{}): {} total spots, {} active, {} occupied",
            self.number,
            self.rows,
            self.columns,
            self.spot_count(),
            active,
            occupied
        )
    }
}
