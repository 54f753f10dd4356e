//! Benchmarks for conversion throughput
//!
//! Copyright (c) 2025 dtdl2tm contributors
//! Licensed under the Apache-2.0 license

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dtdl2tm_core::{
    convert_with, load_source_model_str, to_tab_indented_json, ConversionOptions, Format,
    SourceModel,
};
use serde_json::{json, Value};

fn create_source_value(count: usize) -> Value {
    let primitives = ["boolean", "double", "integer", "string", "dateTime"];
    let mut contents = Vec::with_capacity(count);

    for i in 0..count {
        let item = match i % 3 {
            0 => json!({
                "@type": "Telemetry",
                "name": format!("telemetry{}", i),
                "schema": primitives[i % primitives.len()]
            }),
            1 => json!({
                "@type": ["Property", "Temperature"],
                "name": format!("property{}", i),
                "schema": primitives[i % primitives.len()],
                "writable": i % 2 == 0
            }),
            _ => json!({
                "@type": "Command",
                "name": format!("command{}", i),
                "request": {
                    "name": "args",
                    "schema": {
                        "@type": "Object",
                        "fields": [
                            {"name": "delay", "schema": "integer"},
                            {"name": "reason", "schema": "string"}
                        ]
                    }
                },
                "response": {"name": "accepted", "schema": "boolean"}
            }),
        };
        contents.push(item);
    }

    json!({
        "@id": "dtmi:bench:Device;1",
        "displayName": "Bench Device",
        "description": "Synthetic interface for benchmarks",
        "contents": contents
    })
}

fn create_source(count: usize) -> SourceModel {
    serde_json::from_value(create_source_value(count)).unwrap()
}

fn options() -> ConversionOptions {
    ConversionOptions::default().at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for count in [10, 100, 1000] {
        let source = create_source(count);
        group.bench_with_input(BenchmarkId::new("contents", count), &source, |b, source| {
            b.iter(|| {
                let result = convert_with(black_box(source), options());
                black_box(result)
            })
        });
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    let value = create_source_value(100);
    let as_json = serde_json::to_string(&value).unwrap();
    let as_yaml = serde_yaml::to_string(&value).unwrap();

    group.bench_function("json", |b| {
        b.iter(|| black_box(load_source_model_str(black_box(&as_json), Format::Json)))
    });
    group.bench_function("yaml", |b| {
        b.iter(|| black_box(load_source_model_str(black_box(&as_yaml), Format::Yaml)))
    });

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for count in [10, 1000] {
        let model = convert_with(&create_source(count), options()).unwrap().thing_model;
        group.bench_with_input(BenchmarkId::new("tab_indented", count), &model, |b, model| {
            b.iter(|| black_box(to_tab_indented_json(black_box(model))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convert, bench_load, bench_serialize);
criterion_main!(benches);
