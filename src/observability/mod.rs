//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Counter metrics
//! - Typed lifecycle events
//!
//! Observability is read-only: nothing here feeds back into allocation.
//!
//! # Usage
//!
//! ```ignore
//! use parklot::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::VehicleParked, &[("spot_id", "0-1-2")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_parks();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
