//! CLI module for parklot
//!
//! Provides command-line interface for:
//! - run: Build a lot and serve JSON requests from stdin
//! - layout: Print the generated spot layout

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, LotArgs};
pub use commands::{
    handle_request, layout, layout_summary, resolve_config, run, run_command, serve, serve_session,
    Request,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_response};
