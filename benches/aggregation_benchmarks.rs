//! Performance benchmarks for the aggregation pipeline

use campus_insights::analytics::{
    add_percentage, collapse_minor, group_count, rank_desc, year_from_timestamp,
};
use campus_insights::model::{BaseTable, Field, StudentRecord};
use campus_insights::views::{build_page, View, ViewSettings};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;

const PROVINCES: usize = 77;
const FACULTIES: usize = 14;
const SCHOOLS: usize = 400;

/// Create a student table with skewed province sizes
fn create_table(size: usize) -> BaseTable {
    let rows = (0..size)
        .map(|i| {
            let province = (i * i) % PROVINCES;
            let mut record = StudentRecord::new(format!("{:08}", i))
                .with_province(format!("Province {}", province))
                .with_faculty(format!("Faculty {}", i % FACULTIES))
                .with_registered_at(format!(
                    "{}-{:02}-{:02} 08:30:00",
                    2015 + i % 9,
                    1 + i % 12,
                    1 + i % 28
                ));
            if i % 50 != 0 {
                record = record.with_school(format!("School {}", i % SCHOOLS));
            }
            record
        })
        .collect();
    BaseTable::new(rows).unwrap()
}

fn bench_group_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_count");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    for size in [1_000, 10_000, 100_000].iter() {
        let table = create_table(*size);
        group.bench_with_input(BenchmarkId::new("province", size), &table, |b, table| {
            b.iter(|| group_count(black_box(table), &[Field::Province]).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("province_faculty_school", size),
            &table,
            |b, table| {
                b.iter(|| {
                    group_count(
                        black_box(table),
                        &[Field::Province, Field::Faculty, Field::School],
                    )
                    .unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_share_pipeline(c: &mut Criterion) {
    let table = create_table(10_000);
    let counts = group_count(&table, &[Field::Province]).unwrap();

    c.bench_function("rank_percentage_collapse", |b| {
        b.iter(|| {
            let ranked = rank_desc(black_box(&counts), None);
            collapse_minor(&add_percentage(&ranked), 3.0)
        })
    });
}

fn bench_year_extraction(c: &mut Criterion) {
    let table = create_table(10_000);

    c.bench_function("year_from_timestamp", |b| {
        b.iter(|| year_from_timestamp(black_box(&table), Field::RegisteredAt).unwrap())
    });
}

fn bench_build_pages(c: &mut Criterion) {
    let table = create_table(10_000);
    let settings = ViewSettings::default();

    let mut group = c.benchmark_group("build_page");
    for view in View::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(view), &view, |b, view| {
            b.iter(|| build_page(*view, black_box(&table), &settings).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_group_count,
    bench_share_pipeline,
    bench_year_extraction,
    bench_build_pages
);
criterion_main!(benches);
