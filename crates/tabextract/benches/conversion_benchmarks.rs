//! Conversion performance benchmarks.
//!
//! Measures CSV parsing, schema building and row conversion throughput
//! across table sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabextract::{CsvParser, ExtractTable, MemorySink, Publisher, RowConverter};

/// Generate synthetic CSV data with the specified number of rows and columns.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    for i in 0..cols {
        if i > 0 {
            data.push(',');
        }
        data.push_str(&format!("column_{}", i + 1));
    }
    data.push('\n');

    for row in 0..rows {
        for col in 0..cols {
            if col > 0 {
                data.push(',');
            }
            // Mix of data types, with some missing cells
            match col % 6 {
                0 => data.push_str(&row.to_string()),
                1 => data.push_str(&format!("{:.2}", row as f64 * 1.5)),
                2 => data.push_str(&format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1)),
                3 => data.push_str(if row % 2 == 0 { "true" } else { "false" }),
                4 => data.push_str(&format!("POINT ({} {})", row % 90, row % 180)),
                5 => data.push_str(if row % 7 == 0 { "NA" } else { "label" }),
                _ => unreachable!(),
            }
        }
        data.push('\n');
    }

    data
}

fn parse(rows: usize, cols: usize) -> ExtractTable {
    let data = generate_csv_data(rows, cols);
    let frame = CsvParser::new().parse_bytes(data.as_bytes(), b',').unwrap();
    ExtractTable::new("bench", frame)
}

/// Benchmark parsing CSV bytes into a frame.
fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 12);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(CsvParser::new().parse_bytes(data.as_bytes(), b',').unwrap()))
        });
    }

    group.finish();
}

/// Benchmark inference and schema building.
fn bench_build_schema(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_schema");

    for rows in [1_000, 10_000].iter() {
        let table = parse(*rows, 12);
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(table.schema(true).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark converting rows without a sink.
fn bench_convert_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_rows");

    for rows in [1_000, 10_000].iter() {
        let mut table = parse(*rows, 12);
        table.set_spatial("column_5", true).unwrap();
        let schema = table.schema(true).unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| {
                let mut converter = RowConverter::new(&schema);
                for source in table.frame().rows() {
                    black_box(converter.convert(source.iter()));
                }
            })
        });
    }

    group.finish();
}

/// Benchmark a full publication into memory.
fn bench_publish_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_memory");

    for cols in [6, 12, 24].iter() {
        let publisher = Publisher::new("bench").with_table(parse(5_000, *cols));

        group.bench_with_input(BenchmarkId::new("cols", cols), &publisher, |b, publisher| {
            b.iter(|| {
                let mut sink = MemorySink::new();
                black_box(publisher.publish(&mut sink).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_csv,
    bench_build_schema,
    bench_convert_rows,
    bench_publish_memory,
);
criterion_main!(benches);
