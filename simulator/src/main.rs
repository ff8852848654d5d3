use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use simulator::simulation::Simulator;

/// Synthetic load generator for the surge pricing service.
#[derive(Debug, Parser)]
#[command(name = "simulator")]
struct Args {
    /// Number of simulated drivers.
    #[arg(long, default_value_t = 500)]
    drivers: usize,
    /// Seconds to run each loop.
    #[arg(long, default_value_t = 60)]
    duration: u64,
    /// Base URL of the target service.
    #[arg(long, default_value = "http://localhost")]
    url: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build runtime")?;
    let _guard = rt.enter();
    let simulator = Arc::new(Simulator::new(args.drivers, args.url));
    rt.block_on(simulator.run_simulation(Duration::from_secs(args.duration)))
}
