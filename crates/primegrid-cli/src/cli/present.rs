//! Handoff to the external presentation collaborator.
//!
//! Chart rendering is not part of the pipeline; it consumes the sorted prime
//! sequence, the gap sequence, and a display-scale hint. This module writes
//! that input as a single JSON artifact.

use crate::cli::config::Scale;
use primegrid::MergedSequence;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Serialize)]
struct PlotInput<'a> {
    /// `linear` or `log`; selected with `--large` for wide ranges.
    scale: &'static str,
    primes: &'a [u64],
    gaps: &'a [u64],
}

pub fn write_plot_input(
    path: &Path,
    sequence: &MergedSequence,
    scale: Scale,
) -> anyhow::Result<()> {
    let primes: Vec<u64> = sequence.values().collect();
    let gaps = sequence.gaps();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(
        writer,
        &PlotInput {
            scale: scale.as_str(),
            primes: &primes,
            gaps: &gaps,
        },
    )?;
    Ok(())
}
