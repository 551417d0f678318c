use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use primegrid::PartitionPlan;
use std::path::PathBuf;

/// Runtime configuration for the `primegrid` orchestrator.
///
/// The pipeline surface is a typed command structure: one `run` command with
/// four positional grid parameters plus explicit toggles, and one `clean`
/// command. Paths and the worker command are independently tunable through
/// flags, environment variables, or a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "primegrid",
    version,
    about = "Discover primes over a bounded range with a process x thread worker grid"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full pipeline: search, collect, merge, summarize.
    Run(RunArgs),
    /// Remove the channel directory and derived artifacts.
    Clean(CleanArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of worker processes; each owns one output channel.
    pub process_count: u64,

    /// Number of search threads per process.
    pub thread_count: u64,

    /// Total candidates to examine across the grid.
    pub iteration_count: u64,

    /// First candidate of the searched range.
    pub start_num: u64,

    /// Time the worker invocation and each pipeline stage.
    #[arg(short, long)]
    pub benchmark: bool,

    /// Append per-worker prime counts to the report.
    #[arg(short, long)]
    pub verbose: bool,

    /// Select logarithmic display scaling for large ranges.
    #[arg(short, long)]
    pub large: bool,

    /// Skip writing the presentation artifact.
    #[arg(long)]
    pub no_plot: bool,

    /// Worker grid command to invoke.
    ///
    /// Defaults to the `primegrid-worker` binary next to this one.
    ///
    /// Environment variable: `WORKER_CMD`
    #[arg(long, env = "WORKER_CMD")]
    pub worker_cmd: Option<PathBuf>,

    /// Directory holding one channel file per process.
    ///
    /// Environment variable: `OUTPUT_DIR`
    #[arg(long, env = "OUTPUT_DIR", default_value = "primes")]
    pub output_dir: PathBuf,

    /// Path of the merged artifact.
    ///
    /// Environment variable: `MERGED_PATH`
    #[arg(long, env = "MERGED_PATH", default_value = "all_primes.csv")]
    pub merged_path: PathBuf,

    /// Path of the presentation input artifact.
    ///
    /// Environment variable: `PLOT_INPUT_PATH`
    #[arg(long, env = "PLOT_INPUT_PATH", default_value = "plot_input.json")]
    pub plot_input_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Directory holding one channel file per process.
    ///
    /// Environment variable: `OUTPUT_DIR`
    #[arg(long, env = "OUTPUT_DIR", default_value = "primes")]
    pub output_dir: PathBuf,

    /// Path of the merged artifact.
    ///
    /// Environment variable: `MERGED_PATH`
    #[arg(long, env = "MERGED_PATH", default_value = "all_primes.csv")]
    pub merged_path: PathBuf,

    /// Path of the presentation input artifact.
    ///
    /// Environment variable: `PLOT_INPUT_PATH`
    #[arg(long, env = "PLOT_INPUT_PATH", default_value = "plot_input.json")]
    pub plot_input_path: PathBuf,
}

/// Display scaling hint passed through to the presentation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

impl Scale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Log => "log",
        }
    }
}

/// Validated configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub plan: PartitionPlan,
    pub worker_cmd: PathBuf,
    pub output_dir: PathBuf,
    pub merged_path: PathBuf,
    pub plot_input_path: PathBuf,
    pub benchmark: bool,
    pub verbose: bool,
    pub scale: Scale,
    pub no_plot: bool,
}

impl TryFrom<RunArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        // Rejects a zero-sized grid before any worker is spawned.
        let plan = PartitionPlan::new(
            args.start_num,
            args.iteration_count,
            args.process_count,
            args.thread_count,
        )?;

        let worker_cmd = match args.worker_cmd {
            Some(cmd) => cmd,
            None => default_worker_cmd().context("failed to locate the worker command")?,
        };

        Ok(Self {
            plan,
            worker_cmd,
            output_dir: args.output_dir,
            merged_path: args.merged_path,
            plot_input_path: args.plot_input_path,
            benchmark: args.benchmark,
            verbose: args.verbose,
            scale: if args.large { Scale::Log } else { Scale::Linear },
            no_plot: args.no_plot,
        })
    }
}

fn default_worker_cmd() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .context("orchestrator binary has no parent directory")?;
    Ok(dir.join("primegrid-worker"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(argv: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(argv)
    }

    fn run_args(argv: &[&str]) -> RunArgs {
        match parse(argv).unwrap().command {
            Command::Run(args) => args,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn run_requires_four_positional_parameters() {
        let err = parse(&["primegrid", "run", "4", "2", "100"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn toggles_default_off() {
        let args = run_args(&["primegrid", "run", "4", "2", "100", "2"]);
        assert!(!args.benchmark && !args.verbose && !args.large && !args.no_plot);
    }

    #[test]
    fn all_toggles_parse() {
        let args = run_args(&[
            "primegrid", "run", "4", "2", "100", "2", "-b", "-v", "-l", "--no-plot",
        ]);
        assert!(args.benchmark && args.verbose && args.large && args.no_plot);

        let config = RunConfig::try_from(args).unwrap();
        assert_eq!(config.scale, Scale::Log);
        assert!(config.no_plot);
    }

    #[test]
    fn zero_process_count_is_rejected_before_any_spawn() {
        let args = run_args(&["primegrid", "run", "0", "2", "100", "2"]);
        assert!(RunConfig::try_from(args).is_err());
    }

    #[test]
    fn clean_subcommand_parses() {
        assert!(matches!(
            parse(&["primegrid", "clean"]).unwrap().command,
            Command::Clean(_)
        ));
    }

    #[test]
    fn worker_cmd_flag_overrides_the_default() {
        let args = run_args(&[
            "primegrid",
            "run",
            "2",
            "2",
            "100",
            "2",
            "--worker-cmd",
            "/opt/bin/custom-worker",
        ]);
        let config = RunConfig::try_from(args).unwrap();
        assert_eq!(config.worker_cmd, PathBuf::from("/opt/bin/custom-worker"));
    }
}
