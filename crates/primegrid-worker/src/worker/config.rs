use anyhow::bail;
use clap::Parser;
use primegrid::PartitionPlan;
use std::path::PathBuf;

/// Invocation contract for the worker grid binary.
///
/// The orchestrator calls this binary with four positional parameters. Exit
/// code 0 means every output channel was fully populated; any nonzero exit
/// means the run must be abandoned without merging.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "primegrid-worker",
    version,
    about = "Search a partitioned numeric range for primes with a process x thread grid"
)]
pub struct CliArgs {
    /// Number of worker processes; each owns one output channel.
    pub process_count: u64,

    /// Number of search threads per process.
    pub thread_count: u64,

    /// Total candidates to examine across the grid.
    pub iteration_count: u64,

    /// First candidate of the searched range.
    pub start_num: u64,

    /// Directory receiving one channel file per process.
    ///
    /// Environment variable: `OUTPUT_DIR`
    #[arg(long, env = "OUTPUT_DIR", default_value = "primes")]
    pub output_dir: PathBuf,

    /// Internal: run as the grid process with this id instead of spawning
    /// the grid. Set by the parent invocation on its children.
    #[arg(long, hide = true)]
    pub process_id: Option<u64>,
}

/// Validated runtime configuration for one grid invocation.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub plan: PartitionPlan,
    pub output_dir: PathBuf,
    pub process_id: Option<u64>,
}

impl TryFrom<CliArgs> for WorkerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let plan = PartitionPlan::new(
            args.start_num,
            args.iteration_count,
            args.process_count,
            args.thread_count,
        )?;

        if let Some(process_id) = args.process_id {
            if process_id >= plan.process_count() {
                bail!(
                    "--process-id {} outside the {}-process grid",
                    process_id,
                    plan.process_count()
                );
            }
        }

        Ok(Self {
            plan,
            output_dir: args.output_dir,
            process_id: args.process_id,
        })
    }
}
