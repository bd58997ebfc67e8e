//! CLI argument definitions using clap
//!
//! Commands:
//! - parklot run [--config <path>] [--floors N --rows N --columns N] [--hierarchical] [--verbose]
//! - parklot layout [--config <path>] [--floors N --rows N --columns N]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// parklot - concurrent multi-level parking lot engine
#[derive(Parser, Debug)]
#[command(name = "parklot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Lot selection shared by every command; flags override the config file
#[derive(Args, Debug, Clone, Default)]
pub struct LotArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lot name
    #[arg(long)]
    pub name: Option<String>,

    /// Number of floors (1-8)
    #[arg(long)]
    pub floors: Option<usize>,

    /// Rows per floor (1-1000)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Columns per row (1-1000)
    #[arg(long)]
    pub columns: Option<usize>,

    /// Let smaller vehicles fall back to larger spots
    #[arg(long)]
    pub hierarchical: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve JSON requests from stdin, one per line
    Run {
        #[command(flatten)]
        lot: LotArgs,

        /// Log every park and unpark (to stderr)
        #[arg(long)]
        verbose: bool,
    },

    /// Print the generated spot layout and exit
    Layout {
        #[command(flatten)]
        lot: LotArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
