//! Criterion benchmarks for propmerge critical paths
//!
//! - Document: XML parse and serialize
//! - Store: upsert into documents of growing size
//! - Merge: applying an override batch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use propmerge::document::DEFAULT_INDENT;
use propmerge::{ConfigDocument, ConfigMerger, Override, PropertyStore};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a property file with n properties
fn make_document_xml(n: usize) -> String {
    let body: String = (0..n)
        .map(|i| {
            format!(
                "  <property>\n    <name>bench.prop.{i}</name>\n    <description>property {i}</description>\n    <value>{i}</value>\n  </property>\n"
            )
        })
        .collect();
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<configuration>\n{body}</configuration>\n")
}

/// Generate overrides touching every other existing name plus new ones
fn make_overrides(n: usize) -> Vec<Override> {
    (0..n).map(|i| Override::new(format!("bench.prop.{}", i * 2), format!("v{i}"))).collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_parse");
    for size in [10usize, 100, 1000] {
        let xml = make_document_xml(size);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| ConfigDocument::parse(black_box(xml)))
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_to_xml");
    for size in [10usize, 100, 1000] {
        let Ok(document) = ConfigDocument::parse(&make_document_xml(size)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &document, |b, document| {
            b.iter(|| black_box(document).to_xml(DEFAULT_INDENT))
        });
    }
    group.finish();
}

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_upsert");
    for size in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut store = PropertyStore::new();
                for i in 0..size {
                    store.upsert(&format!("p{i}"), "", "v");
                }
                store.upsert(black_box("p0"), "", "updated");
                store
            })
        });
    }
    group.finish();
}

fn bench_apply_overrides(c: &mut Criterion) {
    let Ok(document) = ConfigDocument::parse(&make_document_xml(500)) else {
        return;
    };
    let overrides = make_overrides(400);
    let merger = ConfigMerger::new();

    c.bench_function("apply_overrides_500x400", |b| {
        b.iter(|| {
            let mut doc = document.clone();
            merger.apply_overrides(&mut doc, black_box(&overrides))
        })
    });
}

criterion_group!(benches, bench_parse, bench_serialize, bench_upsert, bench_apply_overrides);
criterion_main!(benches);
