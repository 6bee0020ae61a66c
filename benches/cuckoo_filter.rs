use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fx_cuckoo::{BrokenSessionsFilter, ExecutiveReportFilter};

fn bench_broken_sessions_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("broken_sessions_insert");
    for size in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut f = BrokenSessionsFilter::with_seed(size, 7).unwrap();
                for i in 0..size {
                    f.add(&format!("key-{i}"), (i % 256) as u32);
                }
            });
        });
    }
    group.finish();
}

fn bench_broken_sessions_query(c: &mut Criterion) {
    let size = 100_000usize;
    let mut f = BrokenSessionsFilter::with_seed(size, 7).unwrap();
    for i in 0..size {
        f.add(&format!("key-{i}"), (i % 256) as u32);
    }

    c.bench_function("broken_sessions_query_hit", |b| {
        b.iter(|| f.query("key-42"));
    });
    c.bench_function("broken_sessions_query_miss", |b| {
        b.iter(|| f.query("not-a-key"));
    });
}

fn bench_executive_report_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("executive_report_insert");
    for size in [1_000usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut f = ExecutiveReportFilter::with_seed(size, 7).unwrap();
                for i in 0..size {
                    let day = (i % 7) as u8;
                    f.add(&format!("key-{i}"), 1, 2, 1, day, false).unwrap();
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_broken_sessions_insert,
    bench_broken_sessions_query,
    bench_executive_report_insert
);
criterion_main!(benches);
