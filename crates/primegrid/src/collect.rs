//! Collection of worker output and the merge into one global sequence.
//!
//! The collector runs strictly after the orchestrator's barrier: every worker
//! process has terminated before the first channel is opened. It reads the
//! exact channel set the [`ChannelRegistry`] enumerates and fails fast if any
//! expected channel is absent. The merger then produces the single globally
//! ordered sequence and checks the invariants that make the partition
//! trustworthy: strictly increasing values and every value inside the
//! searched interval.

use crate::channel::{ChannelRegistry, read_channel};
use crate::error::{Error, Result};
use crate::partition::PartitionPlan;
use crate::record::PrimeRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Reads every record from every channel the plan implies.
///
/// # Errors
///
/// - [`Error::IncompleteRun`] when the channel directory itself is missing
///   (no worker run populated it).
/// - [`Error::MissingChannel`] when an individual expected channel is absent.
/// - [`Error::MalformedRecord`] when any channel line fails to parse.
pub fn collect_records(registry: &ChannelRegistry) -> Result<Vec<PrimeRecord>> {
    if !registry.dir().exists() {
        return Err(Error::IncompleteRun {
            reason: format!(
                "channel directory {} does not exist",
                registry.dir().display()
            ),
        });
    }

    let mut records = Vec::new();
    for path in registry.expected_paths() {
        let channel_records = read_channel(&path)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            channel = %path.display(),
            records = channel_records.len(),
            "collected channel"
        );
        records.extend(channel_records);
    }
    Ok(records)
}

/// The globally ordered result of one run: every discovered prime, ascending,
/// with its worker attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSequence {
    records: Vec<PrimeRecord>,
}

impl MergedSequence {
    /// Sorts the collected records by value and validates the merge
    /// invariants against the plan.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateValue`] when two workers reported the same value
    ///   (overlapping subranges).
    /// - [`Error::ValueOutOfRange`] when a value falls outside
    ///   `[plan.start(), plan.end())` (a stray record).
    pub fn merge(mut records: Vec<PrimeRecord>, plan: &PartitionPlan) -> Result<Self> {
        records.sort_unstable_by_key(|record| record.value);

        for window in records.windows(2) {
            if window[0].value == window[1].value {
                return Err(Error::DuplicateValue {
                    value: window[0].value,
                });
            }
        }
        // Sorted, so the extremes bound every value.
        if let Some(first) = records.first() {
            if first.value < plan.start() {
                return Err(Error::ValueOutOfRange {
                    value: first.value,
                    lo: plan.start(),
                    hi: plan.end(),
                });
            }
        }
        if let Some(last) = records.last() {
            if last.value >= plan.end() {
                return Err(Error::ValueOutOfRange {
                    value: last.value,
                    lo: plan.start(),
                    hi: plan.end(),
                });
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(primes = records.len(), "merged sequence validated");

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending value order.
    pub fn records(&self) -> &[PrimeRecord] {
        &self.records
    }

    /// The sorted prime values.
    pub fn values(&self) -> impl ExactSizeIterator<Item = u64> + '_ {
        self.records.iter().map(|record| record.value)
    }

    /// First-difference sequence: `gap[i] = value[i+1] - value[i]`.
    ///
    /// One element shorter than the sequence itself; empty for fewer than 2
    /// primes.
    pub fn gaps(&self) -> Vec<u64> {
        self.records
            .windows(2)
            .map(|window| window[1].value - window[0].value)
            .collect()
    }

    /// Writes the merged artifact: header `process,thread,prime`, one row per
    /// record, ascending by prime.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "process,thread,prime")?;
        for record in &self.records {
            writeln!(writer, "{record}")?;
        }
        writer.flush()?;
        Ok(())
    }
}
