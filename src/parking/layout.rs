//! # Spot Layout
//!
//! Deterministic assignment of spot types over a floor × row × column grid.
//!
//! Regular grids split each floor by column: the first quarter of the
//! columns holds bicycles, the next quarter motorcycles and the rest
//! automobiles. Every seventh row loses its first two cells of each
//! seven-column block to structural pillars. Single-row grids narrower than
//! four columns use a fixed table instead.
//!
//! Whatever the grid, the finished layout holds at least one spot of every
//! active type whenever it has three or more cells.

use std::collections::BTreeMap;

use super::errors::{ParkingError, ParkingResult};
use super::types::SpotType;

pub const MIN_FLOORS: usize = 1;
pub const MAX_FLOORS: usize = 8;
pub const MIN_ROWS: usize = 1;
pub const MAX_ROWS: usize = 1000;
pub const MIN_COLUMNS: usize = 1;
pub const MAX_COLUMNS: usize = 1000;

const PILLAR_PERIOD: usize = 7;

/// Validate lot dimensions against their bounds; never clamps
pub fn validate_dimensions(floors: usize, rows: usize, columns: usize) -> ParkingResult<()> {
    let checks = [
        ("floors", floors, MIN_FLOORS, MAX_FLOORS),
        ("rows", rows, MIN_ROWS, MAX_ROWS),
        ("columns", columns, MIN_COLUMNS, MAX_COLUMNS),
    ];

    for (field, value, min, max) in checks {
        if value < min || value > max {
            return Err(ParkingError::InvalidDimensions {
                field,
                value,
                min,
                max,
            });
        }
    }

    Ok(())
}

/// Spot type grid for a whole lot, indexed `[floor][row][column]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    grid: Vec<Vec<Vec<SpotType>>>,
    rows: usize,
    columns: usize,
}

impl Layout {
    /// Generate the layout for the given dimensions
    pub fn generate(floors: usize, rows: usize, columns: usize) -> ParkingResult<Self> {
        validate_dimensions(floors, rows, columns)?;

        let grid = (0..floors)
            .map(|f| {
                (0..rows)
                    .map(|r| (0..columns).map(|c| cell_type(f, r, c, rows, columns)).collect())
                    .collect()
            })
            .collect();

        let mut layout = Self { grid, rows, columns };
        layout.ensure_every_active_type();
        Ok(layout)
    }

    pub fn floors(&self) -> usize {
        self.grid.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Spot types of one floor, row-major
    pub fn floor(&self, floor: usize) -> ParkingResult<&[Vec<SpotType>]> {
        self.grid
            .get(floor)
            .map(Vec::as_slice)
            .ok_or(ParkingError::OutOfRange {
                axis: "floor",
                value: floor,
                limit: self.floors(),
            })
    }

    pub fn spot_type(&self, floor: usize, row: usize, column: usize) -> ParkingResult<SpotType> {
        self.check_bounds(floor, row, column)?;
        Ok(self.grid[floor][row][column])
    }

    pub fn set_spot_type(
        &mut self,
        floor: usize,
        row: usize,
        column: usize,
        spot_type: SpotType,
    ) -> ParkingResult<()> {
        self.check_bounds(floor, row, column)?;
        self.grid[floor][row][column] = spot_type;
        Ok(())
    }

    /// Number of cells of each spot type; every type is present as a key
    pub fn count_by_type(&self) -> BTreeMap<SpotType, usize> {
        let mut counts: BTreeMap<SpotType, usize> = SpotType::ALL.iter().map(|t| (*t, 0)).collect();
        for spot_type in self.cells().map(|(_, _, _, t)| t) {
            *counts.entry(spot_type).or_insert(0) += 1;
        }
        counts
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize, usize, SpotType)> + '_ {
        self.grid.iter().enumerate().flat_map(|(f, rows)| {
            rows.iter().enumerate().flat_map(move |(r, cols)| {
                cols.iter().enumerate().map(move |(c, t)| (f, r, c, *t))
            })
        })
    }

    fn check_bounds(&self, floor: usize, row: usize, column: usize) -> ParkingResult<()> {
        let checks = [
            ("floor", floor, self.floors()),
            ("row", row, self.rows),
            ("column", column, self.columns),
        ];
        for (axis, value, limit) in checks {
            if value >= limit {
                return Err(ParkingError::OutOfRange { axis, value, limit });
            }
        }
        Ok(())
    }

    /// Retype cells, floor 0 first, until every active type appears.
    ///
    /// A candidate cell is either inactive or holds a type that has more
    /// than one cell, so patching one type never removes another.
    fn ensure_every_active_type(&mut self) {
        for wanted in SpotType::ACTIVE {
            let counts = self.count_by_type();
            if counts[&wanted] > 0 {
                continue;
            }

            let candidate = self
                .cells()
                .find(|(_, _, _, t)| !t.is_active() || counts[t] > 1)
                .map(|(f, r, c, _)| (f, r, c));

            if let Some((f, r, c)) = candidate {
                self.grid[f][r][c] = wanted;
            }
        }
    }
}

fn cell_type(floor: usize, row: usize, column: usize, rows: usize, columns: usize) -> SpotType {
    if rows == 1 && columns < 4 {
        return narrow_cell_type(floor, column, columns);
    }

    if row % PILLAR_PERIOD == 0 && column % PILLAR_PERIOD <= 1 {
        return SpotType::Inactive;
    }

    let quarter = columns / 4;
    if column < quarter {
        SpotType::Bicycle
    } else if column < quarter * 2 {
        SpotType::Motorcycle
    } else {
        SpotType::Automobile
    }
}

/// Fixed table for single-row grids with fewer than four columns
fn narrow_cell_type(floor: usize, column: usize, columns: usize) -> SpotType {
    match (columns, column) {
        (1, _) => match floor % 3 {
            0 => SpotType::Bicycle,
            1 => SpotType::Motorcycle,
            _ => SpotType::Automobile,
        },
        (2, 0) if floor % 2 == 0 => SpotType::Bicycle,
        (2, 0) => SpotType::Motorcycle,
        (2, _) if floor % 2 == 0 => SpotType::Automobile,
        (2, _) => SpotType::Bicycle,
        (_, 0) => SpotType::Bicycle,
        (_, 1) => SpotType::Motorcycle,
        _ => SpotType::Automobile,
    }
}
