use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use config::Config;
use dieyield::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let params = args.params()?;
    tracing::debug!(?params, "resolved parameters");

    let start = Instant::now();
    let report = params
        .run()
        .with_context(|| "Failed to run the yield simulation.")?;
    print_summary(&params, &report, start.elapsed());

    Ok(())
}

/// Arguments to `dysim`.
///
/// Flags override values from configuration files and `DIEYIELD_*` environment variables.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Tile a wafer or panel with reticle shots, classify every die, and estimate fab yield by Monte Carlo defect injection"
)]
pub struct Args {
    /// An additional configuration file, merged with priority over discovered files.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The substrate type (`wafer` or `panel`).
    ///
    /// Switching type resets the substrate to that type's default size.
    #[arg(short, long)]
    substrate: Option<SubstrateKind>,
    /// The yield model (`poisson`, `murphy`, `rectangular`, `moore`, or `seeds`).
    #[arg(short, long)]
    model: Option<String>,
    /// The defect rate, in defects per cm².
    #[arg(long)]
    defect_rate: Option<f64>,
    /// The critical area, in mm².
    #[arg(long)]
    critical_area: Option<f64>,
    /// The number of Monte Carlo trials.
    #[arg(short = 'n', long)]
    trials: Option<usize>,
    /// The base seed; trial `k` uses `seed + k`.
    #[arg(long, conflicts_with = "no_seed")]
    seed: Option<u64>,
    /// Draw every trial's randomness from OS entropy.
    #[arg(long)]
    no_seed: bool,
    /// Run trials on a thread pool.
    #[arg(short, long)]
    parallel: bool,
    /// Verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Loads configuration and applies command-line overrides.
    fn params(&self) -> anyhow::Result<SimulationParams> {
        let config = Config::from_env_with_files(self.config.clone())
            .with_context(|| "Failed to load configuration.")?;
        let mut params = config.simulation;

        if let Some(kind) = self.substrate {
            if kind != params.substrate.kind() {
                params.substrate = Substrate::with_kind(kind);
            }
        }
        if let Some(ref model) = self.model {
            params.yield_params.model = YieldModel::from_name(model);
        }
        if let Some(rate) = self.defect_rate {
            params.yield_params.defect_rate = rate;
        }
        if let Some(area) = self.critical_area {
            params.yield_params.critical_area = area;
        }
        if let Some(trials) = self.trials {
            params.run.trials = trials;
        }
        if self.no_seed {
            params.run.seed = None;
        } else if let Some(seed) = self.seed {
            params.run.seed = Some(seed);
        }
        params.run.parallel |= self.parallel;

        Ok(params)
    }
}

fn print_summary(params: &SimulationParams, report: &SimulationReport, elapsed: Duration) {
    let batch = &report.batch;
    let (nx, ny) = report.layout.dice_per_shot();

    println!("substrate: {}", params.substrate.kind());
    println!(
        "shots: {} ({} x {} dice per shot, {} dice)",
        report.layout.shots().len(),
        nx,
        ny,
        report.layout.len()
    );
    println!("yield model: {}", params.yield_params.model);
    println!("runs: {}", batch.len());
    println!("mean fab yield: {:.2}%", 100. * batch.mean_fab_yield());
    if batch.len() > 1 {
        println!("min fab yield: {:.2}%", 100. * batch.min_fab_yield());
        println!("max fab yield: {:.2}%", 100. * batch.max_fab_yield());
        println!("std dev: {:.2}%", 100. * batch.fab_yield_std_dev());
    }
    if let Some(first) = batch.first() {
        let tally = first.tally();
        println!("first run:");
        println!("  total dice: {}", tally.total);
        println!("  good physical: {}", tally.good_physical);
        println!("  good: {}", tally.good);
        println!("  defective: {}", tally.defective);
        println!("  partial: {}", tally.partial);
        println!("  lost: {}", tally.lost);
        println!("  fab yield: {:.2}%", 100. * tally.fab_yield);
    }
    println!("yield fraction: {:.4}", report.yield_fraction);
    println!("elapsed: {:.3?}", elapsed);
}
