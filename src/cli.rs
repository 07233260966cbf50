use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "maizeops",
    version,
    about = "Maize sowing-window optimizer driven by fuzzy weather suitability"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for the best sowing day (default)
    Optimize {
        /// Override the configured strategy (genetic | swarm)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Cycle length in days
        #[arg(long)]
        cycle_length: Option<usize>,

        /// Compare the result against an exhaustive scan of the domain
        #[arg(long)]
        validate: bool,
    },
    /// Score a single day's temperature and rainfall
    Evaluate {
        /// Mean daily temperature (°C)
        #[arg(short, long, allow_negative_numbers = true)]
        temperature: f64,

        /// Daily rainfall (mm)
        #[arg(short, long, allow_negative_numbers = true)]
        rainfall: f64,

        /// Reject inputs outside the model's universes
        #[arg(long)]
        strict: bool,

        /// Show membership degrees and rule firing strengths
        #[arg(long)]
        trace: bool,
    },
    /// Evaluate every start day in the domain
    Scan {
        /// Cycle length in days
        #[arg(long)]
        cycle_length: Option<usize>,

        /// Number of best days to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Validate config and forecast source
    Check,
    /// Run interactive setup
    Init,
}
