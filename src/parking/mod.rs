//! Concurrent spot allocation and vehicle tracking engine
//!
//! A [`ParkingLot`] owns its [`Floor`]s, which own their [`Spot`]s;
//! ownership only points downward and spots are addressed by [`SpotId`]
//! values. Three lock tiers keep gates independent:
//!
//! - each spot has its own `RwLock` for occupancy
//! - each floor has a scan lock shared by scans, exclusive for re-typing
//! - the vehicle directory is a sharded map keyed by normalized number
//!
//! # Usage
//!
//! ```ignore
//! use parklot::parking::{ParkingLot, VehicleType};
//!
//! let lot = ParkingLot::create("Central", 2, 3, 4)?;
//! let spot_id = lot.park(VehicleType::Automobile, "KA-01-HH-1234")?;
//! lot.unpark(&spot_id.to_string(), "KA-01-HH-1234")?;
//! ```

mod config;
mod directory;
mod errors;
mod floor;
mod history;
mod layout;
mod lot;
mod spot;
mod types;
mod vehicle;

pub use config::LotConfig;
pub use errors::{ErrorKind, ParkingError, ParkingResult};
pub use floor::{Floor, FloorClaim};
pub use history::{ParkingRecord, VehicleHistory};
pub use layout::{
    validate_dimensions, Layout, MAX_COLUMNS, MAX_FLOORS, MAX_ROWS, MIN_COLUMNS, MIN_FLOORS,
    MIN_ROWS,
};
pub use lot::{LotStatus, ParkingLot};
pub use spot::{Claim, Spot, SpotId, SpotSnapshot};
pub use types::{MatchingPolicy, SpotType, VehicleType};
pub use vehicle::{canonical_vehicle_number, normalize_vehicle_number, validate_vehicle_number, Vehicle};
