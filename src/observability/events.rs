//! Observable events
//!
//! Events are explicit and typed; each maps to a stable upper-case name.

use std::fmt;

use super::logger::Severity;

/// Observable events in a parking lot's life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Lot constructed from a layout
    LotCreated,
    /// Configuration file loaded
    ConfigLoaded,
    /// Request session started
    SessionStart,
    /// Request session ended
    SessionEnd,

    // Allocation
    /// Vehicle parked
    VehicleParked,
    /// Vehicle unparked
    VehicleUnparked,
    /// A scanned spot was taken before it could be claimed
    ParkRaceLost,
    /// Park refused (full lot, contention, bad input)
    ParkRejected,

    // Consistency
    /// Unpark found no open history record
    HistoryInconsistent,

    // Administration
    /// Spot type changed
    SpotRetyped,
    /// All vehicles evicted and indices cleared
    LotReset,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::LotCreated => "LOT_CREATED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SessionStart => "SESSION_BEGIN",
            Event::SessionEnd => "SESSION_COMPLETE",
            Event::VehicleParked => "VEHICLE_PARKED",
            Event::VehicleUnparked => "VEHICLE_UNPARKED",
            Event::ParkRaceLost => "PARK_RACE_LOST",
            Event::ParkRejected => "PARK_REJECTED",
            Event::HistoryInconsistent => "HISTORY_INCONSISTENT",
            Event::SpotRetyped => "SPOT_RETYPED",
            Event::LotReset => "LOT_RESET",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::VehicleParked | Event::VehicleUnparked | Event::ParkRaceLost => Severity::Trace,
            Event::HistoryInconsistent => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::LotCreated,
            Event::ConfigLoaded,
            Event::SessionStart,
            Event::SessionEnd,
            Event::VehicleParked,
            Event::VehicleUnparked,
            Event::ParkRaceLost,
            Event::ParkRejected,
            Event::HistoryInconsistent,
            Event::SpotRetyped,
            Event::LotReset,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_severities() {
        assert_eq!(Event::HistoryInconsistent.severity(), Severity::Warn);
        assert_eq!(Event::VehicleParked.severity(), Severity::Trace);
        assert_eq!(Event::LotReset.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::LotCreated), "LOT_CREATED");
        assert_eq!(format!("{}", Event::SessionEnd), "SESSION_COMPLETE");
    }
}
