//! Grid and profiling performance benchmarks.
//!
//! Measures the filter/sort/paginate pipeline and a full profile over
//! datasets of increasing size.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gridlab::grid::{ColumnFilter, FilterOperator};
use gridlab::{Dataset, GridQuery, Gridlab, InputFormat, SortConfig, SortDirection};

/// Generate a synthetic customer table as CSV.
fn generate_csv(rows: usize) -> String {
    let plans = ["free", "pro", "team", "enterprise"];
    let cities = ["Lisbon", "Oslo", "Lima", "Osaka", "Quito"];

    let mut data = String::from("id,name,email,age,score,signup,plan,city\n");
    for row in 0..rows {
        let age = if row % 17 == 0 { String::new() } else { (18 + row % 60).to_string() };
        data.push_str(&format!(
            "{},User {},user{}@example.com,{},{:.2},2023-{:02}-{:02},{},{}\n",
            row + 1,
            row,
            row,
            age,
            (row as f64 * 7.31) % 100.0,
            (row % 12) + 1,
            (row % 28) + 1,
            plans[row % plans.len()],
            cities[row % cities.len()],
        ));
    }
    data
}

fn load(rows: usize) -> Dataset {
    Gridlab::new()
        .load_str(&generate_csv(rows), InputFormat::Delimited)
        .unwrap()
}

/// Benchmark search + sort + paginate.
fn bench_grid_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_query");

    let query = GridQuery::new()
        .with_search("user1")
        .with_sort(SortConfig::by("score", SortDirection::Desc));

    for rows in [100, 1_000, 10_000].iter() {
        let data = load(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(gridlab::grid::run_query(data, &query)))
        });
    }

    group.finish();
}

/// Benchmark column filters without search.
fn bench_grid_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_filters");

    let query = GridQuery::new()
        .with_filter(ColumnFilter::new("plan", FilterOperator::Equals, "pro"))
        .with_filter(ColumnFilter::new("age", FilterOperator::GreaterThan, 40.0));

    for rows in [1_000, 10_000].iter() {
        let data = load(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(gridlab::grid::run_query(data, &query)))
        });
    }

    group.finish();
}

/// Benchmark the full profile: types, quality, statistics and validation.
fn bench_profile(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile");
    let gridlab = Gridlab::new();

    for rows in [100, 1_000, 10_000].iter() {
        let data = load(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(gridlab.profile_dataset(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_query, bench_grid_filters, bench_profile);
criterion_main!(benches);
