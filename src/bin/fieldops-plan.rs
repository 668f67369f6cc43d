//! Plan one day from a JSON snapshot and print the result as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fieldops_planner::haversine::HaversineMatrix;
use fieldops_planner::osrm::OsrmClient;
use fieldops_planner::store::InMemoryStore;
use fieldops_planner::traits::DistanceMatrixProvider;
use fieldops_planner::{OptimizerConfig, OsrmConfig, Scheduler};

#[derive(Parser, Debug)]
#[command(name = "fieldops-plan", about = "Assign and sequence field-service jobs for one day")]
struct Cli {
    /// Snapshot file with `technicians` and `jobs` arrays
    #[arg(long)]
    snapshot: PathBuf,

    /// Planning date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,

    /// Use an OSRM table service instead of straight-line distances
    #[arg(long)]
    osrm_url: Option<String>,

    /// Straight-line travel speed; OSRM durations replace it
    #[arg(long)]
    avg_speed_kmh: Option<f64>,

    #[arg(long)]
    max_passes: Option<usize>,

    #[arg(long)]
    return_to_base: bool,

    /// Apply the result and write the updated snapshot here
    #[arg(long)]
    commit: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let raw = fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let store: InMemoryStore = serde_json::from_str(&raw).context("parsing snapshot")?;

    if speed_is_ignored(&cli) {
        warn!("--avg-speed-kmh has no effect with --osrm-url; OSRM durations are used");
    }
    let provider: Box<dyn DistanceMatrixProvider> = match &cli.osrm_url {
        Some(url) => Box::new(OsrmClient::new(OsrmConfig {
            base_url: url.clone(),
            ..OsrmConfig::default()
        })?),
        None => Box::new(HaversineMatrix::new(config.avg_speed_kmh)),
    };

    let mut scheduler = Scheduler::new(store, provider);
    let result = scheduler.optimize(cli.date, &config)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(path) = &cli.commit {
        let applied = scheduler.commit(&result)?;
        let updated = serde_json::to_string_pretty(scheduler.store())?;
        fs::write(path, updated).with_context(|| format!("writing {}", path.display()))?;
        info!(applied, path = %path.display(), "snapshot updated");
    }

    Ok(())
}

fn speed_is_ignored(cli: &Cli) -> bool {
    cli.osrm_url.is_some() && cli.avg_speed_kmh.is_some()
}

fn build_config(cli: &Cli) -> Result<OptimizerConfig> {
    let mut config = OptimizerConfig::from_env()?;
    if let Some(speed) = cli.avg_speed_kmh {
        config.avg_speed_kmh = speed;
    }
    if let Some(passes) = cli.max_passes {
        config.max_local_search_passes = passes;
    }
    if cli.return_to_base {
        config.return_to_base = true;
    }
    config.validate()?;
    Ok(config)
}
