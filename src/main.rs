//! Deferred Acceptance - Binary Entry Point
//!
//! Runs one matching over either the built-in sample market or four CSV
//! tables, prints the assignment and its receipt, and optionally checks the
//! result for stability.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deferred_acceptance::{
    embedded_sample, load_files, DataFiles, EngineConfig, IndexBase, MatchingEngine,
    PreferenceData,
};

/// Index base of the ids in the input files
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Base {
    /// Ids start at 0, -1 or an empty cell ends a row
    Zero,
    /// Ids start at 1, 0 or an empty cell ends a row
    One,
}

impl From<Base> for IndexBase {
    fn from(base: Base) -> Self {
        match base {
            Base::Zero => IndexBase::Zero,
            Base::One => IndexBase::One,
        }
    }
}

/// Deferred acceptance CLI
#[derive(Parser)]
#[command(name = "deferred-acceptance")]
#[command(about = "Proposer-optimal stable matching with capacities", long_about = None)]
#[command(version)]
struct Cli {
    /// Run the built-in sample market instead of reading files
    #[arg(long)]
    sample: bool,

    /// Proposer preference table
    #[arg(long, env = "DA_PROPOSERS", required_unless_present = "sample")]
    proposers: Option<PathBuf>,

    /// Receiver preference table
    #[arg(long, env = "DA_RECEIVERS", required_unless_present = "sample")]
    receivers: Option<PathBuf>,

    /// Receiver unacceptable table
    #[arg(long, env = "DA_UNACCEPTABLE", required_unless_present = "sample")]
    unacceptable: Option<PathBuf>,

    /// Capacity table
    #[arg(long, env = "DA_CAPACITIES", required_unless_present = "sample")]
    capacities: Option<PathBuf>,

    /// Index base of the ids in the input files
    #[arg(long, value_enum, default_value = "one")]
    index_base: Base,

    /// Declared proposer count (defaults to the row count of the proposer table)
    #[arg(long)]
    num_proposers: Option<usize>,

    /// Declared receiver count (defaults to the row count of the receiver table)
    #[arg(long)]
    num_receivers: Option<usize>,

    /// Explicit step bound (defaults to proposers * longest list)
    #[arg(long)]
    step_limit: Option<usize>,

    /// Check the result for blocking pairs
    #[arg(long)]
    verify: bool,

    /// Log level
    #[arg(long, env = "DA_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "DA_LOG_JSON")]
    json: bool,
}

impl Cli {
    fn data_files(&self) -> Option<DataFiles> {
        Some(DataFiles {
            proposer_preferences: self.proposers.clone()?,
            receiver_preferences: self.receivers.clone()?,
            receiver_unacceptable: self.unacceptable.clone()?,
            capacities: self.capacities.clone()?,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the result
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let data: PreferenceData = if cli.sample {
        info!("using built-in sample market");
        embedded_sample()
    } else {
        let Some(files) = cli.data_files() else {
            bail!("all four input tables are required without --sample");
        };
        load_files(&files, cli.index_base.into()).context("failed to load input tables")?
    };

    let num_proposers = cli.num_proposers.unwrap_or_else(|| data.proposer_count());
    let num_receivers = cli.num_receivers.unwrap_or_else(|| data.receiver_count());

    let config = cli
        .step_limit
        .map_or_else(EngineConfig::default, EngineConfig::with_step_limit);

    let mut engine = MatchingEngine::with_config(num_proposers, num_receivers, &data, config)
        .context("invalid market")?;
    let result = engine.run().context("matching failed")?;
    let receipt = result.receipt();

    print!("{}", result);
    println!();
    println!("steps:       {}", receipt.steps);
    println!("result root: {}", receipt.result_root_hex());
    if let Some(rate) = receipt.match_rate() {
        println!("match rate:  {}", rate.round_dp(4));
    }

    if cli.verify {
        let report = engine.verify_result(&result);
        if report.is_stable() {
            println!("stable:      yes");
        } else {
            for pair in &report.blocking_pairs {
                warn!(proposer = %pair.proposer, receiver = %pair.receiver, "blocking pair");
            }
            for violation in &report.violations {
                warn!(?violation, "individual rationality violated");
            }
            bail!(
                "result is not stable: {} blocking pairs, {} violations",
                report.blocking_pairs.len(),
                report.violations.len()
            );
        }
    }

    Ok(())
}
