//! Utility to check locations against geo-fences and replay tourist safety scenarios.
//!

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{crate_authors, crate_version, Parser};
use eyre::Result;
use tracing::{info, trace};

use tourguard_common::init_logging;
use tourguard_engine::{list_fences, EngineConfig, FileFenceStore};
use tourguard_geofence::{distance, evaluate, is_in_safe_area, Coordinate};

use crate::cli::{Opts, SubCommand};
use crate::replay::{replay, replay_engine, Scenario};

mod cli;
mod replay;

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging early
    //
    init_logging(NAME, opts.use_tree, opts.use_file.clone())?;
    trace!("Logging initialised.");

    let cfg = EngineConfig::load(opts.config.as_deref())?;

    // `--fences` wins over the configuration
    //
    let fname = opts
        .fences
        .clone()
        .or_else(|| cfg.fences.as_ref().map(PathBuf::from));
    let fences = FileFenceStore::load(fname.as_deref())?;
    info!("{} fences loaded", fences.all().len());

    trace!("Execute commands.");
    match opts.subcmd {
        SubCommand::Distance(dopts) => {
            let p1 = Coordinate::new(dopts.lat1, dopts.lon1)?;
            let p2 = Coordinate::new(dopts.lat2, dopts.lon2)?;
            println!("{:.3}", distance(&p1, &p2));
        }
        SubCommand::Check(copts) => {
            let point = Coordinate::new(copts.lat, copts.lon)?;
            let at = copts.at.unwrap_or_else(Utc::now);

            let active = fences
                .all()
                .iter()
                .filter(|f| f.active)
                .cloned()
                .collect::<Vec<_>>();
            let alerts = evaluate(&point, &active, at)?;
            let safe = is_in_safe_area(&point, &active)?;

            let res = serde_json::json!({ "alerts": alerts, "safeArea": safe });
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        SubCommand::Fences => {
            println!("{}", list_fences(fences.all()));
        }
        SubCommand::Replay(ropts) => {
            let scenario = Scenario::load(&ropts.file)?;
            let (engine, _store) = replay_engine(cfg, Arc::new(fences), &scenario).await?;

            for line in replay(&engine, &scenario).await? {
                println!("{line}");
            }
        }
        SubCommand::Version => {
            println!(
                "{} v{} by {}\n{}\n{}\n{}",
                NAME,
                VERSION,
                AUTHORS,
                tourguard_common::version(),
                tourguard_engine::version(),
                tourguard_geofence::version(),
            );
        }
    }
    Ok(())
}
