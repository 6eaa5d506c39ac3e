use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rollup_sql::{group_count, join, pivot, with_rollup, JoinKind, RollupLabels, Table, Value};
use std::time::Duration;

fn bench_rows() -> usize {
    std::env::var("ROLLUP_SQL_BENCH_ROWS")
        .ok()
        .and_then(|v| v.replace('_', "").parse::<usize>().ok())
        .filter(|&v| (10_000..=5_000_000).contains(&v))
        .unwrap_or(200_000)
}

fn build_rentals(rows: usize) -> Table {
    let markets = 20usize;
    let products = 500usize;

    Table::with_rows(
        vec!["Market", "Product_Code", "Customer", "Payment"],
        (0..rows).map(|i| {
            vec![
                Value::from(format!("M{}", i % markets)),
                Value::from(format!("P{}", (i / 7) % products)),
                Value::from(format!("C{}", i % 10_000)),
                Value::Int((i % 100) as i64),
            ]
        }),
    )
    .unwrap()
}

fn build_products() -> Table {
    Table::with_rows(
        vec!["Product_Code", "Segment"],
        (0..500).map(|p| {
            vec![
                Value::from(format!("P{p}")),
                Value::from(format!("Seg {}", p % 6)),
            ]
        }),
    )
    .unwrap()
}

fn bench_pivot_rollup(c: &mut Criterion) {
    let rows = bench_rows();
    let rentals = build_rentals(rows);
    let products = build_products();

    let joined = join(&rentals, &products, &["Product_Code"], JoinKind::Inner).unwrap();
    let segments: Vec<Value> = (0..6).map(|s| Value::from(format!("Seg {s}"))).collect();

    let mut group = c.benchmark_group("pivot_rollup");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(rows as u64));

    group.bench_with_input(BenchmarkId::new("join", rows), &rows, |b, _| {
        b.iter(|| {
            let result = join(&rentals, &products, &["Product_Code"], JoinKind::Inner).unwrap();
            black_box(result);
        })
    });

    group.bench_with_input(BenchmarkId::new("group_count", rows), &rows, |b, _| {
        b.iter(|| {
            let result =
                group_count(&joined, &["Market", "Customer", "Segment"], "Count").unwrap();
            black_box(result);
        })
    });

    group.bench_with_input(BenchmarkId::new("pivot_with_rollup", rows), &rows, |b, _| {
        b.iter(|| {
            let pivoted = pivot(&joined, "Market", "Product_Code", "Segment", &segments).unwrap();
            let result = with_rollup(
                &pivoted,
                "Market",
                "Product_Code",
                &RollupLabels::default(),
            )
            .unwrap();
            black_box(result);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_pivot_rollup);
criterion_main!(benches);
