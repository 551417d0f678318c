#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::config::{CliArgs, Command, RunConfig};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();

    // A malformed invocation prints the diagnostic and exits cleanly; only
    // pipeline failures signal an error to the caller.
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print()?;
            return Ok(());
        }
    };

    cli::telemetry::init_telemetry();

    match args.command {
        Command::Run(run_args) => {
            let config = RunConfig::try_from(run_args)?;
            cli::pipeline::run(&config)
        }
        Command::Clean(clean_args) => cli::pipeline::clean(&clean_args),
    }
}
