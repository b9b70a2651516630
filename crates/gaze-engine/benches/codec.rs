use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gaze_engine::{ParseOptions, SceneParser, parse, reconstruct, serialize, tokenize};
mod common;

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    group.sample_size(10);

    for size in [100, 1_000] {
        let content = common::generate_flat_scene(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| std::hint::black_box(tokenize(std::hint::black_box(content))));
        });
    }

    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    group.sample_size(10);

    let records = tokenize(&common::generate_nested_scene(4, 5));
    group.bench_function("nested_4x5", |b| {
        b.iter(|| std::hint::black_box(reconstruct(std::hint::black_box(&records))));
    });

    let legacy = SceneParser::with_options(ParseOptions::legacy());
    let content = common::generate_nested_scene(4, 5);
    group.bench_function("nested_4x5_last_segment", |b| {
        b.iter(|| std::hint::black_box(legacy.parse(std::hint::black_box(&content))));
    });

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_trip");
    group.sample_size(10);

    let content = common::generate_nested_scene(3, 6);
    group.bench_function("parse_serialize", |b| {
        b.iter(|| {
            let tree = parse(std::hint::black_box(&content));
            std::hint::black_box(tree.map(|t| serialize(&t)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_reconstruct, bench_round_trip);
criterion_main!(benches);
