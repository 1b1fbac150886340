//! Render and serialization benchmarks
//!
//! Measures the two halves of a generation run separately, in memory.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use folio::component::builders::*;
use folio::{
    ComponentTree, Config, FontRegistry, InMemoryResourceProvider, JsxRenderer, PdfSerializer,
};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;

/// A document with a paragraph and a table row per record.
fn report(records: usize) -> ComponentTree {
    document()
        .prop("defaultStyle", json!({"font": "Helvetica", "fontSize": 10}))
        .prop("styles", json!({"heading": {"fontSize": 14, "bold": true}}))
        .child(header().child(text("Report {{copyrightYear}}").alignment("right")))
        .child(
            content()
                .child(text("Summary").style("heading"))
                .children((0..records).map(|i| {
                    text(format!(
                        "Record {} describes an item in enough words to wrap onto a second line \
                         of the page when set in a ten point font.",
                        i
                    ))
                }))
                .child(
                    table()
                        .prop("widths", json!(["*", 80]))
                        .prop("headerRows", 1)
                        .child(row().child("Item").child("Amount"))
                        .children((0..records).map(|i| {
                            row()
                                .child(format!("Item {}", i))
                                .child(format!("{}.00", i * 3))
                        })),
                ),
        )
        .child(footer().child(text("Page {{currentPage}} of {{pageCount}}").alignment("center")))
        .into_tree()
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let renderer = JsxRenderer::new();
    let config = Config::new().with("copyrightYear", 2018);

    for records in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("records", records), &records, |b, &records| {
            b.iter(|| {
                let model = renderer
                    .render(report(records), &config)
                    .expect("render failed");
                black_box(model);
            });
        });
    }
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    let config = Config::new().with("copyrightYear", 2018);
    let fonts = FontRegistry::standard();
    let serializer = PdfSerializer::new(Arc::new(InMemoryResourceProvider::new()));

    for records in [10, 100, 1000] {
        let model = JsxRenderer::new()
            .render(report(records), &config)
            .expect("render failed");
        group.bench_with_input(BenchmarkId::new("records", records), &model, |b, model| {
            b.iter(|| {
                let mut out = Vec::with_capacity(64 * 1024);
                serializer
                    .serialize(model, &fonts, &mut out)
                    .expect("serialize failed");
                black_box(out);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_render, benchmark_serialize);
criterion_main!(benches);
