use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use polyreport::{
    BenchTable, CompareOptions,
    bench_utils::{Growth, SyntheticScheme, generate_series, player_counts},
    compare::compare_all,
    measurement::Series,
};

const SEED: u64 = 0x5EED;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

fn schemes() -> Vec<SyntheticScheme> {
    vec![
        SyntheticScheme::new("jf", Growth::Quadratic, 40.0, 2_000.0),
        SyntheticScheme::new("ejf", Growth::Quadratic, 25.0, 2_500.0),
        SyntheticScheme::new("amt", Growth::NLogN, 150.0, 8_000.0),
        SyntheticScheme::new("fk", Growth::Linear, 900.0, 12_000.0),
    ]
}

fn build_series(max_log2: u32) -> Vec<Series> {
    let keys = player_counts(max_log2);
    schemes()
        .iter()
        .enumerate()
        .map(|(idx, scheme)| {
            generate_series(scheme, &keys, 0.05, Some(7), SEED + idx as u64)
                .expect("synthetic series")
        })
        .collect()
}

fn build_table(series: &[Series]) -> BenchTable {
    let rows = series.iter().flat_map(|s| {
        s.points().iter().map(move |p| {
            vec![
                s.label().to_string(),
                p.key.to_string(),
                p.measurement.to_string(),
            ]
        })
    });
    BenchTable::from_records(["dkg", "n", "avg_deal_usec"], rows).expect("table")
}

fn bench_compare_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_all");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    let opts = CompareOptions::default();
    for max_log2 in [10u32, 16, 20] {
        let series = build_series(max_log2);
        group.bench_with_input(BenchmarkId::from_parameter(max_log2), &series, |b, series| {
            b.iter(|| compare_all(series, &opts).expect("compare"));
        });
    }
    group.finish();
}

fn bench_table_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_series");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for max_log2 in [10u32, 20] {
        let table = build_table(&build_series(max_log2));
        group.bench_with_input(BenchmarkId::from_parameter(max_log2), &table, |b, table| {
            b.iter(|| {
                table
                    .humanize_usec_columns(2)
                    .and_then(|t| t.series("dkg", "n", "avg_deal_usec"))
                    .expect("series")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compare_all, bench_table_series);
criterion_main!(benches);
