//! # Parking Errors
//!
//! Error types for the parking engine. Every variant maps to a stable
//! string code so adapters can render or special-case it without matching
//! on message text.

use thiserror::Error;

/// Result type for parking operations
pub type ParkingResult<T> = Result<T, ParkingError>;

/// Coarse classification of a [`ParkingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidDimensions,
    InvalidVehicleType,
    InvalidVehicleNumber,
    InvalidSpotType,
    InvalidSpotId,
    OutOfRange,
    SpotInactive,
    SpotAlreadyOccupied,
    SpotNotOccupied,
    VehicleMismatch,
    VehicleAlreadyParked,
    VehicleNotFound,
    NoSpaceAvailable,
    InvalidOperation,
    VacationError,
    AllocationContention,
    Internal,
}

/// Parking engine errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParkingError {
    // ==================
    // Validation Errors
    // ==================
    /// Lot dimension outside its allowed range
    #[error("Invalid {field}: {value} (must be between {min} and {max})")]
    InvalidDimensions {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Unknown vehicle type
    #[error("Invalid vehicle type: {0}")]
    InvalidVehicleType(String),

    /// Vehicle number failed validation
    #[error("Invalid vehicle number '{number}': {reason}")]
    InvalidVehicleNumber { number: String, reason: String },

    /// Unknown spot type code
    #[error("Invalid spot type: {0}")]
    InvalidSpotType(String),

    /// Malformed or unresolvable spot ID
    #[error("Invalid spot ID '{spot_id}': {reason}")]
    InvalidSpotId { spot_id: String, reason: String },

    /// Coordinate outside a floor or lot
    #[error("{axis} {value} out of range [0-{limit})")]
    OutOfRange {
        axis: &'static str,
        value: usize,
        limit: usize,
    },

    // ==================
    // Spot State Errors
    // ==================
    /// Spot cannot hold vehicles
    #[error("Spot {spot_id} is inactive")]
    SpotInactive { spot_id: String },

    /// Spot already holds a vehicle
    #[error("Spot {spot_id} is already occupied by {occupant}")]
    SpotAlreadyOccupied { spot_id: String, occupant: String },

    /// Spot holds no vehicle
    #[error("Spot {spot_id} is not occupied")]
    SpotNotOccupied { spot_id: String },

    /// Spot holds a different vehicle than the caller named
    #[error("Spot {spot_id} is occupied by {occupant}, not {vehicle_number}")]
    VehicleMismatch {
        spot_id: String,
        occupant: String,
        vehicle_number: String,
    },

    // ==================
    // Vehicle Errors
    // ==================
    /// Vehicle already holds a spot
    #[error("Vehicle {vehicle_number} is already parked at spot {spot_id}")]
    VehicleAlreadyParked {
        vehicle_number: String,
        spot_id: String,
    },

    /// Vehicle is unknown to the lot
    #[error("Vehicle {vehicle_number} not found")]
    VehicleNotFound { vehicle_number: String },

    /// No compatible spot is free
    #[error("No space available for vehicle type {vehicle_type}")]
    NoSpaceAvailable { vehicle_type: String },

    /// Operation inconsistent with current state
    #[error("Invalid operation '{operation}': {reason}")]
    InvalidOperation {
        operation: &'static str,
        reason: String,
    },

    /// Vacating a spot failed during unpark
    #[error("Failed to vacate spot {spot_id}: {source}")]
    VacationError {
        spot_id: String,
        #[source]
        source: Box<ParkingError>,
    },

    /// Every allocation attempt lost a race although spots remain
    #[error("Could not allocate a {vehicle_type} spot after {attempts} contended attempts")]
    AllocationContention {
        vehicle_type: String,
        attempts: usize,
    },

    // ==================
    // Internal Errors
    // ==================
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ParkingError {
    pub(crate) fn poisoned() -> Self {
        ParkingError::Internal("Lock poisoned".into())
    }

    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParkingError::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
            ParkingError::InvalidVehicleType(_) => ErrorKind::InvalidVehicleType,
            ParkingError::InvalidVehicleNumber { .. } => ErrorKind::InvalidVehicleNumber,
            ParkingError::InvalidSpotType(_) => ErrorKind::InvalidSpotType,
            ParkingError::InvalidSpotId { .. } => ErrorKind::InvalidSpotId,
            ParkingError::OutOfRange { .. } => ErrorKind::OutOfRange,
            ParkingError::SpotInactive { .. } => ErrorKind::SpotInactive,
            ParkingError::SpotAlreadyOccupied { .. } => ErrorKind::SpotAlreadyOccupied,
            ParkingError::SpotNotOccupied { .. } => ErrorKind::SpotNotOccupied,
            ParkingError::VehicleMismatch { .. } => ErrorKind::VehicleMismatch,
            ParkingError::VehicleAlreadyParked { .. } => ErrorKind::VehicleAlreadyParked,
            ParkingError::VehicleNotFound { .. } => ErrorKind::VehicleNotFound,
            ParkingError::NoSpaceAvailable { .. } => ErrorKind::NoSpaceAvailable,
            ParkingError::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            ParkingError::VacationError { .. } => ErrorKind::VacationError,
            ParkingError::AllocationContention { .. } => ErrorKind::AllocationContention,
            ParkingError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidDimensions => "INVALID_DIMENSIONS",
            ErrorKind::InvalidVehicleType => "INVALID_VEHICLE_TYPE",
            ErrorKind::InvalidVehicleNumber => "INVALID_VEHICLE_NUMBER",
            ErrorKind::InvalidSpotType => "INVALID_SPOT_TYPE",
            ErrorKind::InvalidSpotId => "INVALID_SPOT_ID",
            ErrorKind::OutOfRange => "OUT_OF_RANGE",
            ErrorKind::SpotInactive => "SPOT_INACTIVE",
            ErrorKind::SpotAlreadyOccupied => "SPOT_ALREADY_OCCUPIED",
            ErrorKind::SpotNotOccupied => "SPOT_NOT_OCCUPIED",
            ErrorKind::VehicleMismatch => "VEHICLE_MISMATCH",
            ErrorKind::VehicleAlreadyParked => "VEHICLE_ALREADY_PARKED",
            ErrorKind::VehicleNotFound => "VEHICLE_NOT_FOUND",
            ErrorKind::NoSpaceAvailable => "NO_SPACE_AVAILABLE",
            ErrorKind::InvalidOperation => "INVALID_OPERATION",
            ErrorKind::VacationError => "VACATION_ERROR",
            ErrorKind::AllocationContention => "ALLOCATION_CONTENTION",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// The vehicle is simply unknown (informational, not a failure)
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::VehicleNotFound
    }

    /// The lot cannot take this vehicle right now
    pub fn is_capacity(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NoSpaceAvailable | ErrorKind::AllocationContention
        )
    }

    /// Malformed input supplied by the caller
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidDimensions
                | ErrorKind::InvalidVehicleType
                | ErrorKind::InvalidVehicleNumber
                | ErrorKind::InvalidSpotType
                | ErrorKind::InvalidSpotId
                | ErrorKind::OutOfRange
        )
    }
}
