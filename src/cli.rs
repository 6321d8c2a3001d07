//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser)]
#[command(name = "kurumadai")]
#[command(version)]
#[command(about = "Car money (車代) reimbursement tracking and car-pool seat assignment")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record car money for one away game
    Submit {
        /// Event date (e.g. 2025-04-12). Defaults to today.
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Comma-separated driver names
        #[arg(long)]
        drivers: String,

        /// Flat fare tier in yen (200/400/600/800/1000/1200)
        #[arg(long, short = 'a')]
        amount: Option<i64>,

        /// Venue name; the fare tier is derived from the distance table
        #[arg(long)]
        destination: Option<String>,

        /// Drivers only drove one way
        #[arg(long)]
        one_way: bool,

        /// Toll road used both ways (toll cost replaces the base fare)
        #[arg(long)]
        toll_round_trip: bool,

        /// Toll road used one way (toll cost added to half the base fare)
        #[arg(long)]
        toll_one_way: bool,

        /// Toll cost in yen; omit to record it as 未定
        #[arg(long)]
        toll_cost: Option<String>,
    },

    /// Compute a fare without recording it
    Fare {
        /// Flat fare tier in yen
        #[arg(long, short = 'a')]
        amount: Option<i64>,

        /// Driving distance in km (overrides --amount via the tier table)
        #[arg(long)]
        distance_km: Option<f64>,

        /// One-way drive
        #[arg(long)]
        one_way: bool,

        /// Toll road used both ways
        #[arg(long)]
        toll_round_trip: bool,

        /// Toll road used one way
        #[arg(long)]
        toll_one_way: bool,

        /// Toll cost in yen; omit to mark it 未定
        #[arg(long)]
        toll_cost: Option<String>,
    },

    /// Show the monthly reimbursement summary
    Summary,

    /// List records awaiting toll-cost reconciliation
    Pending,

    /// Report an outstanding toll cost for one record
    Resolve {
        /// Event date of the record
        #[arg(long, short = 'd')]
        date: String,

        /// Driver name of the record
        #[arg(long)]
        driver: String,

        /// Reported toll cost in yen
        #[arg(long)]
        toll_cost: i64,
    },

    /// Delete every record of one submission batch
    Undo {
        /// Batch id printed at submission time
        #[arg(long)]
        batch: String,
    },

    /// Delete a single driver's records on a date
    Delete {
        /// Event date of the record
        #[arg(long, short = 'd')]
        date: String,

        /// Driver name of the record
        #[arg(long)]
        driver: String,
    },

    /// Assign attending participants to drivers' cars
    Assign {
        /// Roster CSV path. Uses config value if not specified.
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Comma-separated attending participant names; all when omitted
        #[arg(long)]
        attending: Option<String>,

        /// Cap on the number of vehicles
        #[arg(long)]
        vehicles: Option<usize>,

        /// Shuffle seed for a reproducible assignment
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Export the trip log (.csv) or log plus summary (.xlsx)
    Export {
        /// Output file path; format chosen by extension
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set trip log path
        #[arg(long)]
        set_log: Option<PathBuf>,

        /// Set roster CSV path
        #[arg(long)]
        set_roster: Option<PathBuf>,

        /// Set distance table CSV path
        #[arg(long)]
        set_distance_table: Option<PathBuf>,

        /// Set the home ground name used as the distance origin
        #[arg(long)]
        set_origin: Option<String>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
