#![doc = include_str!("../README.md")]

mod worker;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use worker::config::{CliArgs, WorkerConfig};

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Workers log to stderr; stdout stays clean for the invoking process.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = WorkerConfig::try_from(args)?;

    match config.process_id {
        Some(process_id) => worker::grid::run_process(&config, process_id),
        None => worker::grid::run_grid(&config),
    }
}
