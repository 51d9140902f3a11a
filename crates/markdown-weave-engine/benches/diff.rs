use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use markdown_weave_engine::{diff, parse_document};
mod common;

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    group.sample_size(10);

    let content = common::generate_complex_markdown(10, 4);
    let old = parse_document(&content).unwrap();

    for every in [0, 10, 3] {
        let new = parse_document(&common::edit_paragraphs(&content, every)).unwrap();
        group.bench_with_input(BenchmarkId::new("edited_every", every), &new, |b, new| {
            b.iter(|| diff(std::hint::black_box(&old), new, true));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_diff);
criterion_main!(benches);
