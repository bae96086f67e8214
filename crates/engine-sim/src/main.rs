//! Simulated order flow against the matching engine core.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_sim::config::{Config, ConfigOverrides};
use engine_sim::order_source::{RandomFlow, RandomOrderSource, ReplayOrderSource};
use engine_sim::reporter::Reporter;
use engine_sim::runner;

#[derive(Parser)]
#[command(name = "engine-sim")]
#[command(about = "Continuous double-auction engine driven by simulated order flow")]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the cycle reports.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()
        .context("invalid environment configuration")?
        .with_overrides(cli.overrides)
        .context("invalid command-line configuration")?;

    let reporter = Reporter::new(config.format, io::stdout());

    match &config.replay {
        Some(path) => {
            let source = ReplayOrderSource::open(path)
                .with_context(|| format!("failed to load replay file {}", path.display()))?;
            info!(path = %path.display(), batches = source.remaining(), "replaying orders");
            runner::run(&config, source, reporter).await?;
        }
        None => {
            let seed = config.seed.unwrap_or_else(rand::random);
            info!(seed, "generating random orders");
            let source = RandomOrderSource::new(RandomFlow::from(&config), seed);
            runner::run(&config, source, reporter).await?;
        }
    }

    Ok(())
}
