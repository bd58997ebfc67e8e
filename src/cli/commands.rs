//! CLI command implementations
//!
//! Commands are thin adapters: they build a lot from configuration and
//! translate JSON requests into engine calls. No allocation logic lives
//! here.

use std::io::{self, BufRead, Write};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};
use crate::parking::{normalize_vehicle_number, Layout, LotConfig, ParkingLot, SpotType, VehicleType};

use super::args::{Command, LotArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_response};

/// One request line, tagged by `op`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Park {
        vehicle_type: String,
        vehicle_number: String,
    },
    Unpark {
        spot_id: String,
        vehicle_number: String,
    },
    Available {
        vehicle_type: String,
    },
    Search {
        vehicle_number: String,
    },
    History {
        vehicle_number: String,
    },
    SetSpotType {
        spot_id: String,
        spot_type: String,
    },
    Status,
    Reset,
    Metrics,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run { lot, verbose } => {
            // stdout carries responses only
            Logger::set_stderr_only(true);
            if verbose {
                Logger::set_min_severity(Severity::Trace);
            }
            serve(&resolve_config(&lot)?)
        }
        Command::Layout { lot } => layout(&resolve_config(&lot)?),
    }
}

/// Merge the config file (if any) with command-line overrides
pub fn resolve_config(args: &LotArgs) -> CliResult<LotConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let config = LotConfig::load(path).map_err(|e| CliError::config_error(e.to_string()))?;
            let path = path.display().to_string();
            log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);
            config
        }
        None => LotConfig::default(),
    };

    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    if let Some(floors) = args.floors {
        config.floors = floors;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if args.hierarchical {
        config.strict_matching = false;
    }

    config
        .validate()
        .map_err(|e| CliError::config_error(e.to_string()))?;
    Ok(config)
}

/// Build the lot and serve stdin until EOF
pub fn serve(config: &LotConfig) -> CliResult<()> {
    let lot = ParkingLot::with_config(config).map_err(|e| CliError::config_error(e.to_string()))?;

    log_event(Event::SessionStart);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let handled = serve_session(&lot, stdin.lock(), &mut stdout.lock())?;

    let handled = handled.to_string();
    log_event_with_fields(Event::SessionEnd, &[("requests", handled.as_str())]);
    Ok(())
}

/// Answer every request line from `reader`; returns the number of lines
/// handled
///
/// Request and engine errors become error responses; only I/O errors end
/// the session.
pub fn serve_session<R: BufRead, W: Write>(
    lot: &ParkingLot,
    reader: R,
    writer: &mut W,
) -> CliResult<usize> {
    let mut handled = 0;

    for request in read_requests(reader) {
        let result = request.and_then(|value| {
            let request: Request = serde_json::from_value(value)
                .map_err(|e| CliError::bad_request(format!("invalid request: {}", e)))?;
            handle_request(lot, request)
        });
        handled += 1;

        match result {
            Ok(data) => write_response(writer, data)?,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => write_error(writer, e.code_str(), e.message())?,
        }
    }

    Ok(handled)
}

/// Execute one request against the lot
pub fn handle_request(lot: &ParkingLot, request: Request) -> CliResult<Value> {
    let data = match request {
        Request::Park {
            vehicle_type,
            vehicle_number,
        } => {
            let vehicle_type: VehicleType = vehicle_type.parse()?;
            let spot_id = lot.park(vehicle_type, &vehicle_number)?;
            json!({
                "spot_id": spot_id,
                "vehicle_number": normalize_vehicle_number(&vehicle_number),
                "vehicle_type": vehicle_type,
            })
        }
        Request::Unpark {
            spot_id,
            vehicle_number,
        } => {
            lot.unpark(&spot_id, &vehicle_number)?;
            json!({
                "spot_id": spot_id,
                "vehicle_number": normalize_vehicle_number(&vehicle_number),
                "unparked": true,
            })
        }
        Request::Available { vehicle_type } => {
            let vehicle_type: VehicleType = vehicle_type.parse()?;
            let spot_ids = lot.available_spot(vehicle_type)?;
            json!({
                "vehicle_type": vehicle_type,
                "count": spot_ids.len(),
                "spot_ids": spot_ids,
            })
        }
        Request::Search { vehicle_number } => {
            let (spot_id, parked) = lot.search_vehicle(&vehicle_number)?;
            json!({
                "vehicle_number": normalize_vehicle_number(&vehicle_number),
                "spot_id": spot_id,
                "parked": parked,
            })
        }
        Request::History { vehicle_number } => to_value(lot.vehicle_history(&vehicle_number)?)?,
        Request::SetSpotType { spot_id, spot_type } => {
            let spot_type: SpotType = spot_type.parse()?;
            lot.set_spot_type(&spot_id, spot_type)?;
            json!({
                "spot_id": spot_id,
                "spot_type": spot_type,
            })
        }
        Request::Status => to_value(lot.status()?)?,
        Request::Reset => {
            lot.reset()?;
            json!({ "reset": true })
        }
        Request::Metrics => to_value(lot.metrics())?,
    };

    Ok(data)
}

fn to_value<T: serde::Serialize>(value: T) -> CliResult<Value> {
    serde_json::to_value(value).map_err(|e| CliError::io_error(format!("JSON error: {}", e)))
}

/// Print the layout a configuration generates
pub fn layout(config: &LotConfig) -> CliResult<()> {
    let data = layout_summary(config)?;
    write_response(&mut io::stdout().lock(), data)
}

/// Layout as JSON: per-type counts plus one symbol string per row
pub fn layout_summary(config: &LotConfig) -> CliResult<Value> {
    let layout = Layout::generate(config.floors, config.rows, config.columns)?;

    let mut floors = Vec::with_capacity(layout.floors());
    for f in 0..layout.floors() {
        let rows: Vec<String> = layout
            .floor(f)?
            .iter()
            .map(|row| row.iter().map(|t| t.symbol(false)).collect())
            .collect();
        floors.push(json!({ "floor": f, "rows": rows }));
    }

    Ok(json!({
        "floors": layout.floors(),
        "rows": layout.rows(),
        "columns": layout.columns(),
        "counts": layout.count_by_type(),
        "grid": floors,
    }))
}
