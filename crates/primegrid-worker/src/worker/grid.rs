//! The two levels of the worker grid.
//!
//! A grid invocation (no `--process-id`) resets the channel directory and
//! re-executes this binary once per process, then waits for all children:
//! the only barrier in the run. A process invocation (`--process-id N`) owns
//! one output channel and runs the configured number of search threads over
//! its assigned subranges.
//!
//! Processes share nothing: each writes only its own channel. Threads within
//! a process share only the channel writer, and each appends its discoveries
//! as one block after its scan completes, so the serialization never stalls
//! another thread's search loop.

use crate::worker::config::WorkerConfig;
use anyhow::{Context, bail};
use primegrid::{ChannelRegistry, ChannelWriter, PrimeRecord, search_range};
use std::process::{Child, Command};
use std::thread;

/// Parent mode: spawn one child per process and wait for all of them.
pub fn run_grid(config: &WorkerConfig) -> anyhow::Result<()> {
    let registry = ChannelRegistry::new(&config.output_dir, &config.plan);
    registry
        .reset_dir()
        .context("failed to reset the channel directory")?;

    let exe = std::env::current_exe().context("failed to resolve the worker executable")?;
    let mut children: Vec<(u64, Child)> = Vec::with_capacity(config.plan.process_count() as usize);

    for process_id in 0..config.plan.process_count() {
        let child = Command::new(&exe)
            .arg(config.plan.process_count().to_string())
            .arg(config.plan.thread_count().to_string())
            .arg(config.plan.iteration_count().to_string())
            .arg(config.plan.start().to_string())
            .arg("--output-dir")
            .arg(&config.output_dir)
            .arg("--process-id")
            .arg(process_id.to_string())
            .spawn()
            .with_context(|| format!("failed to spawn grid process {process_id}"))?;
        tracing::debug!(process_id, pid = child.id(), "spawned grid process");
        children.push((process_id, child));
    }

    // Barrier: every process must terminate before the run can be judged.
    let mut failures = 0u64;
    for (process_id, mut child) in children {
        let status = child
            .wait()
            .with_context(|| format!("failed waiting on grid process {process_id}"))?;
        if !status.success() {
            tracing::error!(process_id, %status, "grid process failed");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} grid process(es) exited with failure; channels are not trustworthy");
    }
    Ok(())
}

/// Child mode: run the search threads of one grid process.
pub fn run_process(config: &WorkerConfig, process_id: u64) -> anyhow::Result<()> {
    let registry = ChannelRegistry::new(&config.output_dir, &config.plan);
    let writer = ChannelWriter::create(registry.channel_path(process_id))
        .with_context(|| format!("failed to create the channel for process {process_id}"))?;

    thread::scope(|scope| -> anyhow::Result<()> {
        let mut handles = Vec::with_capacity(config.plan.thread_count() as usize);
        for thread_id in 0..config.plan.thread_count() {
            let writer = &writer;
            let plan = &config.plan;
            handles.push((
                thread_id,
                scope.spawn(move || -> primegrid::Result<usize> {
                    let assignment = plan.assignment(process_id, thread_id)?;
                    let found = search_range(assignment.range);
                    let block: Vec<PrimeRecord> = found
                        .into_iter()
                        .map(|value| PrimeRecord::new(process_id, thread_id, value))
                        .collect();
                    writer.append_block(&block)?;
                    Ok(block.len())
                }),
            ));
        }

        for (thread_id, handle) in handles {
            match handle.join() {
                Ok(Ok(found)) => {
                    tracing::trace!(process_id, thread_id, found, "search thread finished");
                }
                Ok(Err(err)) => {
                    return Err(err).with_context(|| {
                        format!("search thread {thread_id} of process {process_id} failed")
                    });
                }
                Err(_) => bail!("search thread {thread_id} of process {process_id} panicked"),
            }
        }
        Ok(())
    })?;

    writer
        .finish()
        .with_context(|| format!("failed to flush the channel for process {process_id}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use primegrid::{MergedSequence, PartitionPlan, collect_records, search_range};

    fn config(dir: &std::path::Path, processes: u64, threads: u64) -> WorkerConfig {
        WorkerConfig {
            plan: PartitionPlan::new(2, 100, processes, threads).unwrap(),
            output_dir: dir.to_path_buf(),
            process_id: None,
        }
    }

    #[test]
    fn one_process_writes_exactly_its_assigned_primes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 2, 2);
        let registry = ChannelRegistry::new(&config.output_dir, &config.plan);
        registry.reset_dir().unwrap();

        run_process(&config, 0).unwrap();

        let records = primegrid::read_channel(&registry.channel_path(0)).unwrap();
        let expected: Vec<u64> = (0..2)
            .flat_map(|tid| search_range(config.plan.assignment(0, tid).unwrap().range))
            .collect();
        let mut got: Vec<u64> = records.iter().map(|record| record.value).collect();
        got.sort_unstable();
        let mut expected_sorted = expected;
        expected_sorted.sort_unstable();
        assert_eq!(got, expected_sorted);
        assert!(records.iter().all(|record| record.process_id == 0));
    }

    #[test]
    fn all_processes_together_cover_the_whole_range() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), 3, 2);
        let registry = ChannelRegistry::new(&config.output_dir, &config.plan);
        registry.reset_dir().unwrap();

        for process_id in 0..config.plan.process_count() {
            run_process(&config, process_id).unwrap();
        }

        let merged =
            MergedSequence::merge(collect_records(&registry).unwrap(), &config.plan).unwrap();
        assert_eq!(
            merged.values().collect::<Vec<_>>(),
            search_range(2..102)
        );
    }

    #[test]
    fn unwritable_channel_fails_the_process() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path().join("missing_subdir").as_path(), 1, 1);
        // The channel directory was never created, so the channel file
        // cannot be.
        assert!(run_process(&config, 0).is_err());
    }
}
