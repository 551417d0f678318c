use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use primegrid::{MergedSequence, PartitionPlan, PrimeRecord, search_range};

fn search_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_range");
    for span in [1_000u64, 10_000, 100_000] {
        group.throughput(Throughput::Elements(span));
        group.bench_function(format!("span/{span}"), |b| {
            b.iter(|| search_range(black_box(1_000_000..1_000_000 + span)));
        });
    }
    group.finish();
}

fn merge_bench(c: &mut Criterion) {
    let plan = PartitionPlan::new(2, 1_000_000, 4, 4).unwrap();
    let records: Vec<PrimeRecord> = plan
        .assignments()
        .flat_map(|assignment| {
            let (pid, tid) = (assignment.process_id, assignment.thread_id);
            search_range(assignment.range)
                .into_iter()
                .map(move |value| PrimeRecord::new(pid, tid, value))
        })
        .collect();

    let mut group = c.benchmark_group("merge");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("sort_and_validate", |b| {
        b.iter(|| MergedSequence::merge(black_box(records.clone()), &plan).unwrap());
    });
    group.finish();
}

criterion_group!(benches, search_bench, merge_bench);
criterion_main!(benches);
