//! The orchestrated pipeline: worker grid, barrier, collection, merge,
//! statistics, presentation.
//!
//! Stage order is fixed: the worker command must terminate successfully
//! before any channel is read, and every fatal error aborts before the next
//! stage runs. No stage substitutes defaults for a failed predecessor.

use crate::cli::config::{CleanArgs, RunConfig};
use crate::cli::{present, report};
use anyhow::Context;
use primegrid::{
    ChannelRegistry, Error, MergedSequence, SummaryStatistics, collect_records, per_worker_counts,
};
use std::fs;
use std::process::Command;
use std::time::{Duration, Instant};

/// Wall-clock timings of the pipeline stages, reported in benchmark mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageTimings {
    pub worker: Duration,
    pub collect: Duration,
    pub merge: Duration,
    pub report: Duration,
}

pub fn run(config: &RunConfig) -> anyhow::Result<()> {
    let mut timings = StageTimings::default();

    let workers = config.plan.worker_count();
    let cpus = num_cpus::get() as u64;
    if workers > cpus {
        tracing::info!(workers, cpus, "worker grid is wider than the available cores");
    }

    // === Worker stage ===
    tracing::info!(
        processes = config.plan.process_count(),
        threads = config.plan.thread_count(),
        iterations = config.plan.iteration_count(),
        start = config.plan.start(),
        worker_cmd = %config.worker_cmd.display(),
        "running the worker grid"
    );
    let started = Instant::now();
    let status = Command::new(&config.worker_cmd)
        .arg(config.plan.process_count().to_string())
        .arg(config.plan.thread_count().to_string())
        .arg(config.plan.iteration_count().to_string())
        .arg(config.plan.start().to_string())
        .arg("--output-dir")
        .arg(&config.output_dir)
        .status()
        .with_context(|| {
            format!(
                "worker stage: failed to invoke {}",
                config.worker_cmd.display()
            )
        })?;
    timings.worker = started.elapsed();

    // Barrier passed: all worker processes have terminated.
    if !status.success() {
        return Err(Error::WorkerFailure {
            context: format!("worker command exited with {status}"),
        })
        .context("worker stage failed; the run is abandoned without merging");
    }

    // === Collect stage ===
    let started = Instant::now();
    let registry = ChannelRegistry::new(&config.output_dir, &config.plan);
    let records = collect_records(&registry).context("collect stage failed")?;
    timings.collect = started.elapsed();

    // === Merge stage ===
    let started = Instant::now();
    let merged = MergedSequence::merge(records, &config.plan).context("merge stage failed")?;
    merged
        .write_csv(&config.merged_path)
        .context("merge stage: failed to write the merged artifact")?;
    timings.merge = started.elapsed();
    tracing::info!(
        primes = merged.len(),
        artifact = %config.merged_path.display(),
        "merged sequence written"
    );

    // === Statistics stage ===
    let started = Instant::now();
    match SummaryStatistics::compute(&merged) {
        Ok(stats) => report::print_summary(&stats),
        // Count is still meaningful with fewer than 2 primes; the ratio
        // metrics are reported as undefined without failing the run.
        Err(err @ Error::DivisionUndefined { .. }) => {
            report::print_undefined(merged.len(), &err);
        }
        Err(err) => return Err(err).context("statistics stage failed"),
    }
    if config.verbose {
        report::print_worker_counts(&per_worker_counts(&merged));
    }
    timings.report = started.elapsed();

    // === Presentation handoff ===
    if config.no_plot {
        tracing::debug!("presentation artifact suppressed");
    } else {
        present::write_plot_input(&config.plot_input_path, &merged, config.scale)
            .context("presentation stage: failed to write the plot input artifact")?;
        tracing::info!(
            artifact = %config.plot_input_path.display(),
            scale = config.scale.as_str(),
            "presentation input written"
        );
    }

    if config.benchmark {
        report::print_timings(&timings);
    }
    Ok(())
}

/// Removes the channel directory and every derived artifact.
pub fn clean(args: &CleanArgs) -> anyhow::Result<()> {
    if args.output_dir.exists() {
        fs::remove_dir_all(&args.output_dir).with_context(|| {
            format!(
                "failed to remove the channel directory {}",
                args.output_dir.display()
            )
        })?;
        tracing::info!(dir = %args.output_dir.display(), "removed channel directory");
    }
    for path in [&args.merged_path, &args.plot_input_path] {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            tracing::info!(artifact = %path.display(), "removed artifact");
        }
    }
    Ok(())
}
