//! Per-process output channels and the registry that enumerates them.
//!
//! Every process in the grid owns exactly one channel file, shared by that
//! process's search threads. The registry derives the expected channel set
//! from the partition plan up front, so the collector looks up exact paths
//! instead of discovering an unknown set by pattern matching.

use crate::error::{Error, Result};
use crate::partition::PartitionPlan;
use crate::record::PrimeRecord;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Explicit enumeration of the channel files implied by a [`PartitionPlan`]:
/// one per `process_id`, all under a single channel directory.
#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    dir: PathBuf,
    process_count: u64,
}

impl ChannelRegistry {
    pub fn new(dir: impl Into<PathBuf>, plan: &PartitionPlan) -> Self {
        Self {
            dir: dir.into(),
            process_count: plan.process_count(),
        }
    }

    /// Directory holding every channel file of the run.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the channel owned by `process_id`.
    pub fn channel_path(&self, process_id: u64) -> PathBuf {
        self.dir.join(format!("primes_p{process_id}.csv"))
    }

    /// Every channel path the plan implies, in `process_id` order.
    pub fn expected_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (0..self.process_count).map(|pid| self.channel_path(pid))
    }

    /// Removes any channel directory left over from a previous run and
    /// recreates it empty.
    pub fn reset_dir(&self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}

/// Append sink for one process's records.
///
/// All threads of a process share one writer. Appends are serialized by a
/// mutex, and each worker appends its discoveries as a single block, so
/// record lines never interleave. The lock is held only while emitting
/// records, never during the search itself.
#[derive(Debug)]
pub struct ChannelWriter {
    path: PathBuf,
    inner: Mutex<BufWriter<File>>,
}

impl ChannelWriter {
    /// Creates (truncating) the channel file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            inner: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one worker's discoveries as a contiguous block of lines.
    pub fn append_block(&self, records: &[PrimeRecord]) -> Result<()> {
        let mut writer = self.inner.lock();
        for record in records {
            writeln!(writer, "{record}")?;
        }
        Ok(())
    }

    /// Flushes buffered records to disk.
    ///
    /// Must be called after all writing threads have been joined.
    pub fn finish(self) -> Result<()> {
        self.inner.into_inner().flush()?;
        Ok(())
    }
}

/// Reads every record from the channel at `path`.
///
/// # Errors
///
/// - [`Error::MissingChannel`] when the file does not exist.
/// - [`Error::MalformedRecord`] when a line does not parse, with 1-based line
///   context.
pub fn read_channel(path: &Path) -> Result<Vec<PrimeRecord>> {
    if !path.exists() {
        return Err(Error::MissingChannel {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let record =
            PrimeRecord::parse_line(&line).map_err(|reason| Error::MalformedRecord {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })?;
        records.push(record);
    }
    Ok(records)
}
