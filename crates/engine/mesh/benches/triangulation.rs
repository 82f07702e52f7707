//! Benchmarks for fan triangulation and the mesh codec
//!
//! Measures `triangulate`, `encode_mesh` and `decode_pointset` over point sets
//! of increasing size.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mesh::codec::{decode_pointset, encode_mesh, encode_pointset};
use mesh::{triangulate, PointSet, Vec2};
use std::hint::black_box;

const SIZES: [usize; 3] = [100, 1_000, 100_000];

/// Points spread around a circle, so the fan stays non-degenerate
fn circle_points(count: usize) -> PointSet {
    let step = std::f32::consts::TAU / count as f32;
    PointSet::new(
        (0..count)
            .map(|i| {
                let angle = i as f32 * step;
                Vec2::new(angle.cos() * 100.0, angle.sin() * 100.0)
            })
            .collect(),
    )
}

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate");
    for size in SIZES {
        let points = circle_points(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| black_box(triangulate(black_box(points))));
        });
    }
    group.finish();
}

fn bench_encode_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_mesh");
    for size in SIZES {
        let points = circle_points(size);
        let triangles = triangulate(&points);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(points, triangles),
            |b, (points, triangles)| {
                b.iter(|| black_box(encode_mesh(black_box(points), black_box(triangles))));
            },
        );
    }
    group.finish();
}

fn bench_decode_pointset(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_pointset");
    for size in SIZES {
        let data = encode_pointset(&circle_points(size));
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(decode_pointset(black_box(data))));
        });
    }
    group.finish();
}

/// Full request pipeline minus the network: decode, triangulate, encode
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for size in SIZES {
        let data = encode_pointset(&circle_points(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| {
                let points = decode_pointset(black_box(data)).unwrap();
                let triangles = triangulate(&points);
                black_box(encode_mesh(&points, &triangles).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_triangulate,
    bench_encode_mesh,
    bench_decode_pointset,
    bench_pipeline,
);
criterion_main!(benches);
