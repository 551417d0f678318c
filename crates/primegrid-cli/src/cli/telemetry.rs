//! Log subscriber setup for the orchestrator.
//!
//! Diagnostics go to stderr through `tracing`; the statistics report itself
//! is program output and goes to stdout untouched. Verbosity is controlled
//! with `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

pub fn init_telemetry() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
