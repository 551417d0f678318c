//! Plain-text report of one run's summary statistics.
//!
//! The report is program output and goes to stdout; diagnostics stay on
//! stderr. Line shapes and precision follow the historical reports so
//! existing consumers can diff the numbers.

use crate::cli::pipeline::StageTimings;
use primegrid::{Error, SummaryStatistics};
use std::collections::BTreeMap;

pub fn print_summary(stats: &SummaryStatistics) {
    println!(
        "Range: {} to {} ({})\n",
        stats.min, stats.max, stats.range
    );
    println!("Total primes found {}", stats.count);
    println!(
        "Percentage of numbers that are primes {:.3}%",
        stats.density_pct
    );
    println!("Standard Deviation {:.3}\n", stats.prime_dispersion);
    println!("Total twin primes found {}", stats.twin_count);
    println!(
        "Percentage of primes that are twin primes {:.3}%\n",
        stats.twin_pct
    );
    println!("Largest gap between primes found {}", stats.max_gap);
    println!("Average prime gap {:.3}", stats.avg_gap);
    println!("Standard Deviation {:.3}", stats.gap_dispersion);
}

/// Report for a run whose ratio metrics are undefined (fewer than 2 primes).
pub fn print_undefined(count: usize, err: &Error) {
    println!("Total primes found {count}");
    println!("Range and gap statistics: {err}");
}

/// Per-worker prime counts, in grid order.
pub fn print_worker_counts(counts: &BTreeMap<(u64, u64), usize>) {
    println!("\nprocess thread prime_count");
    for (&(process_id, thread_id), &count) in counts {
        println!("{process_id:>7} {thread_id:>6} {count:>11}");
    }
}

pub fn print_timings(timings: &StageTimings) {
    println!("\n=== Timing Results ===");
    println!("worker  {:>12.3?}", timings.worker);
    println!("collect {:>12.3?}", timings.collect);
    println!("merge   {:>12.3?}", timings.merge);
    println!("report  {:>12.3?}", timings.report);
    println!("======================");
}
