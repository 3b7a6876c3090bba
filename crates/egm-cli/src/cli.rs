use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "egm", author, version, about = "Energy grid mock-data and analysis toolkit", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a mock dataset and persist it as JSON
    Generate {
        /// Output path for the dataset file
        #[arg(long)]
        out: PathBuf,
        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u64>,
        /// Reference date anchoring all generated dates (YYYY-MM-DD)
        #[arg(long)]
        reference_date: Option<NaiveDate>,
        /// Generator configuration file (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also synthesize topology edges and write them here
        #[arg(long)]
        topology: Option<PathBuf>,
        /// Equipment count override
        #[arg(long)]
        equipment: Option<i64>,
        /// Maintenance record count override
        #[arg(long)]
        maintenance_records: Option<i64>,
        /// Sensor count override
        #[arg(long)]
        sensors: Option<i64>,
        /// Alert count override
        #[arg(long)]
        alerts: Option<i64>,
        /// Customer count override
        #[arg(long)]
        customers: Option<i64>,
        /// Installation count override
        #[arg(long)]
        installations: Option<i64>,
    },
    /// Load a dataset file and report validation diagnostics
    Validate {
        /// Path to the dataset file
        #[arg(long)]
        data: PathBuf,
    },
    /// Run one analysis scenario over a dataset and print the JSON report
    Report {
        /// Scenario to run
        #[arg(value_enum)]
        scenario: Scenario,
        /// Path to the dataset file
        #[arg(long)]
        data: PathBuf,
        /// Path to the topology edges file (required for `impact`)
        #[arg(long)]
        topology: Option<PathBuf>,
        /// Equipment id to analyze (required for `impact`, optional filter
        /// for `schedule`)
        #[arg(long)]
        equipment: Option<String>,
        /// Schedule window start (YYYY-MM-DD); defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Size of the costliest-equipment ranking
        #[arg(long, default_value_t = egm_query::DEFAULT_TOP_N)]
        top: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Equipment with vibration-related maintenance
    Vibration,
    /// Two-week maintenance schedule
    Schedule,
    /// Risk score buckets and high-risk fleet profile
    Risk,
    /// Dependency / impact analysis for one equipment item
    Impact,
    /// Sensor anomaly detection
    Sensors,
    /// Maintenance cost aggregation
    Cost,
}
