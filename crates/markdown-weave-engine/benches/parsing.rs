use criterion::{Criterion, criterion_group, criterion_main};
use markdown_weave_engine::{parse_document, to_markdown};
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let flat = common::generate_markdown_content(100);
    group.bench_function("flat_document", |b| {
        b.iter(|| parse_document(std::hint::black_box(&flat)));
    });

    let nested = common::generate_complex_markdown(20, 5);
    group.bench_function("nested_document", |b| {
        b.iter(|| parse_document(std::hint::black_box(&nested)));
    });

    group.finish();
}

fn bench_regenerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    group.sample_size(10);

    let doc = parse_document(&common::generate_markdown_content(100)).unwrap();
    group.bench_function("to_markdown", |b| {
        b.iter(|| to_markdown(std::hint::black_box(&doc)));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_regenerate);
criterion_main!(benches);
