//! Error types for the prime discovery pipeline.
//!
//! This module defines the central `Error` enum, which captures every
//! reportable failure across the pipeline stages: partitioning, worker
//! execution, channel collection, merging, and statistics.
//!
//! ## Error Cases
//! - `InvalidConfiguration`: Bad partition parameters; the run never starts.
//! - `WorkerFailure`: A worker process exited nonzero or could not write its
//!   channel. Fatal; no partial merge is attempted.
//! - `MissingChannel`: An output channel expected from the partition plan does
//!   not exist on disk.
//! - `IncompleteRun`: The channel set on disk is not the one the plan implies.
//! - `MalformedRecord`: A channel line did not parse as a prime record.
//! - `DuplicateValue` / `ValueOutOfRange`: Merge invariant violations,
//!   indicating overlapping or stray worker output.
//! - `DivisionUndefined`: A ratio statistic was requested over an empty range
//!   (fewer than 2 primes found).

use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the prime discovery pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The partition parameters cannot describe a valid worker grid.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A worker exited with a failure status or failed to emit records.
    #[error("worker failure: {context}")]
    WorkerFailure { context: String },

    /// An output channel expected from the partition plan is absent.
    #[error("missing output channel: {}", path.display())]
    MissingChannel { path: PathBuf },

    /// The worker run left fewer channels or records than the plan implies.
    #[error("incomplete run: {reason}")]
    IncompleteRun { reason: String },

    /// A channel line did not parse as `process_id,thread_id,value`.
    #[error("malformed record at {}:{line}: {reason}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The same value was reported by more than one worker.
    #[error("duplicate value {value} in merged sequence")]
    DuplicateValue { value: u64 },

    /// A reported value falls outside the searched interval.
    #[error("value {value} outside searched range [{lo}, {hi})")]
    ValueOutOfRange { value: u64, lo: u64, hi: u64 },

    /// A ratio metric over `max - min` is undefined for this sequence.
    #[error("{metric} is undefined: fewer than 2 primes in the merged sequence")]
    DivisionUndefined { metric: &'static str },

    /// Filesystem failure while reading or writing channel data.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
