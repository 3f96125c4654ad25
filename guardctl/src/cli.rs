//! Module describing all possible commands and sub-commands to the `guardctl` main driver
//!
//! - `distance` computes the great-circle distance between two points,
//! - `check` evaluates one point against the fences,
//! - `fences` lists the fences in use,
//! - `replay` runs a JSON scenario through an in-memory engine,
//! - `version`.
//!
//! Fences come from `--fences`, then from the `fences` entry of `engine.hcl`, then from the
//! built-in set.
//!

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{crate_authors, crate_description, crate_name, crate_version, Parser};

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Fence file, overrides the configuration.
    #[clap(long)]
    pub fences: Option<PathBuf>,
    /// Enable hierarchical logging.
    #[clap(long)]
    pub use_tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub use_file: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `distance LAT1 LON1 LAT2 LON2`
/// `check [--at TIME] LAT LON`
/// `fences`
/// `replay FILE`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Distance in km between two points
    Distance(DistanceOpts),
    /// Evaluate one point against the active fences
    Check(CheckOpts),
    /// List all fences
    Fences,
    /// Replay a scenario file through the engine
    Replay(ReplayOpts),
    /// List all package versions
    Version,
}

// ------

#[derive(Debug, Parser)]
#[command(allow_negative_numbers = true)]
pub struct DistanceOpts {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

// ------

#[derive(Debug, Parser)]
#[command(allow_negative_numbers = true)]
pub struct CheckOpts {
    /// Time of the sample, RFC 3339 (default is now)
    #[clap(long)]
    pub at: Option<DateTime<Utc>>,
    pub lat: f64,
    pub lon: f64,
}

// ------

#[derive(Debug, Parser)]
pub struct ReplayOpts {
    /// Scenario file (JSON)
    pub file: PathBuf,
}
