//! Summary statistics derived from a merged prime sequence.

use crate::collect::MergedSequence;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Read-only snapshot of the metrics derived from one run.
///
/// Computed once from the merged sequence and its gap sequence, then only
/// read. The dispersion metrics intentionally preserve the historical
/// formula `sqrt(mean(x^2) / mean(x)^2)` rather than the conventional
/// standard deviation; downstream consumers compare against the numbers the
/// original reports produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    /// Number of primes in the merged sequence.
    pub count: usize,
    /// Smallest prime found.
    pub min: u64,
    /// Largest prime found.
    pub max: u64,
    /// `max - min`.
    pub range: u64,
    /// `100 * count / range`.
    pub density_pct: f64,
    /// Dispersion of the prime sequence.
    pub prime_dispersion: f64,
    /// Number of gaps equal to 2.
    pub twin_count: usize,
    /// `100 * twin_count / range`.
    pub twin_pct: f64,
    /// Largest gap between consecutive primes.
    pub max_gap: u64,
    /// Arithmetic mean of the gap sequence.
    pub avg_gap: f64,
    /// Dispersion of the gap sequence.
    pub gap_dispersion: f64,
}

impl SummaryStatistics {
    /// Computes every metric from the merged sequence.
    ///
    /// Pure: no side effects beyond the returned snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionUndefined`] when fewer than 2 primes were
    /// found. `range` is then 0 and every ratio and gap metric is undefined
    /// at once; only the prime count remains meaningful, and callers report
    /// it from the sequence itself.
    pub fn compute(sequence: &MergedSequence) -> Result<Self> {
        let count = sequence.len();
        if count < 2 {
            return Err(Error::DivisionUndefined {
                metric: "density_pct",
            });
        }

        let values: Vec<u64> = sequence.values().collect();
        let gaps = sequence.gaps();

        let min = values[0];
        let max = values[count - 1];
        let range = max - min;

        let twin_count = gaps.iter().filter(|&&gap| gap == 2).count();
        let max_gap = *gaps.iter().max().unwrap_or(&0);
        let avg_gap = mean(&gaps);

        Ok(Self {
            count,
            min,
            max,
            range,
            density_pct: 100.0 * count as f64 / range as f64,
            prime_dispersion: dispersion(&values),
            twin_count,
            twin_pct: 100.0 * twin_count as f64 / range as f64,
            max_gap,
            avg_gap,
            gap_dispersion: dispersion(&gaps),
        })
    }
}

/// Prime counts per worker, keyed `(process_id, thread_id)` in grid order.
///
/// Diagnostic grouping for verbose reporting.
pub fn per_worker_counts(sequence: &MergedSequence) -> BTreeMap<(u64, u64), usize> {
    let mut counts = BTreeMap::new();
    for record in sequence.records() {
        *counts
            .entry((record.process_id, record.thread_id))
            .or_insert(0) += 1;
    }
    counts
}

fn mean(xs: &[u64]) -> f64 {
    xs.iter().map(|&x| x as f64).sum::<f64>() / xs.len() as f64
}

/// `sqrt(mean(x^2) / mean(x)^2)`, the historical dispersion formula.
fn dispersion(xs: &[u64]) -> f64 {
    let mean_sq = xs.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / xs.len() as f64;
    let m = mean(xs);
    (mean_sq / (m * m)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionPlan;
    use crate::primality::search_range;
    use crate::record::PrimeRecord;

    fn merged(start: u64, iterations: u64) -> MergedSequence {
        let plan = PartitionPlan::new(start, iterations, 1, 1).unwrap();
        let records: Vec<PrimeRecord> = search_range(start..start + iterations)
            .into_iter()
            .map(|value| PrimeRecord::new(0, 0, value))
            .collect();
        MergedSequence::merge(records, &plan).unwrap()
    }

    #[test]
    fn hundred_candidate_scenario_from_two() {
        let stats = SummaryStatistics::compute(&merged(2, 100)).unwrap();

        assert_eq!(stats.count, 26);
        assert_eq!(stats.min, 2);
        assert_eq!(stats.max, 101);
        assert_eq!(stats.range, 99);
        // Twin pairs in [2, 102): (3,5) (5,7) (11,13) (17,19) (29,31)
        // (41,43) (59,61) (71,73).
        assert_eq!(stats.twin_count, 8);
        assert!((stats.density_pct - 100.0 * 26.0 / 99.0).abs() < 1e-9);
        assert!((stats.twin_pct - 100.0 * 8.0 / 99.0).abs() < 1e-9);
    }

    #[test]
    fn gap_metrics_match_the_gap_sequence() {
        let sequence = merged(2, 100);
        let stats = SummaryStatistics::compute(&sequence).unwrap();
        let gaps = sequence.gaps();

        assert_eq!(stats.max_gap, *gaps.iter().max().unwrap());
        let expected_avg = gaps.iter().sum::<u64>() as f64 / gaps.len() as f64;
        assert!((stats.avg_gap - expected_avg).abs() < 1e-9);
        assert_eq!(
            gaps.iter().filter(|&&gap| gap == 2).count(),
            stats.twin_count
        );
    }

    #[test]
    fn dispersion_uses_the_historical_formula() {
        // For [1, 2, 3]: mean = 2, mean of squares = 14/3,
        // so dispersion = sqrt((14/3) / 4).
        let expected = ((14.0 / 3.0) / 4.0_f64).sqrt();
        assert!((dispersion(&[1, 2, 3]) - expected).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_two_primes_is_division_undefined() {
        let plan = PartitionPlan::new(24, 4, 1, 1).unwrap();
        // [24, 28) holds no primes at all.
        let empty = MergedSequence::merge(Vec::new(), &plan).unwrap();
        assert!(matches!(
            SummaryStatistics::compute(&empty),
            Err(Error::DivisionUndefined { .. })
        ));

        let single =
            MergedSequence::merge(vec![PrimeRecord::new(0, 0, 5)], &PartitionPlan::new(4, 4, 1, 1).unwrap())
                .unwrap();
        assert!(matches!(
            SummaryStatistics::compute(&single),
            Err(Error::DivisionUndefined { .. })
        ));
    }

    #[test]
    fn per_worker_counts_groups_in_grid_order() {
        let plan = PartitionPlan::new(2, 20, 2, 1).unwrap();
        let records = vec![
            PrimeRecord::new(0, 0, 2),
            PrimeRecord::new(0, 0, 3),
            PrimeRecord::new(0, 0, 5),
            PrimeRecord::new(0, 0, 7),
            PrimeRecord::new(0, 0, 11),
            PrimeRecord::new(1, 0, 13),
            PrimeRecord::new(1, 0, 17),
            PrimeRecord::new(1, 0, 19),
        ];
        let merged = MergedSequence::merge(records, &plan).unwrap();
        let counts = per_worker_counts(&merged);

        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            vec![((0, 0), 5), ((1, 0), 3)]
        );
    }
}
