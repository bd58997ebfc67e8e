//! parklot - concurrent spot allocation and vehicle tracking for
//! multi-level parking facilities

pub mod cli;
pub mod observability;
pub mod parking;
