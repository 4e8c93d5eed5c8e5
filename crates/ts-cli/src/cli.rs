//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::parse::ParseArgs;
use crate::commands::resolve::MatchArgs;

/// Timesheet assistant.
///
/// Parses work notes such as "Worked on GSC Matter - draft email 1h 30m"
/// into duration, billing units, date, and matter.
#[derive(Debug, Parser)]
#[command(name = "ts", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a time entry into duration, units, date, and matter.
    Parse(ParseArgs),

    /// Show which matters a piece of text resolves to.
    Match(MatchArgs),

    /// Convert minutes into 6-minute billing units.
    Units {
        /// Number of minutes.
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },

    /// List the configured matter candidates.
    Matters {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
