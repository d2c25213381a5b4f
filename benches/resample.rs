//! Benchmarks for padding, binning and replication

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array3;
use tomo_morph::{apply_pad, downsample_2d, downsample_3d, f16, kernel, upsample_3d, PadConfig};

fn benchmark_downsample_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("downsample_f32");

    for size in [64, 128, 256].iter() {
        let input = Array3::from_shape_fn((*size, *size, *size), |(z, y, x)| {
            ((z * 100 + y * 10 + x) % 256) as f32 / 255.0
        });

        let voxels = (*size as u64).pow(3);
        group.throughput(Throughput::Elements(voxels));

        group.bench_with_input(BenchmarkId::new("2d_level1", size), &size, |b, _| {
            b.iter(|| black_box(downsample_2d(&input.view(), 1)))
        });

        group.bench_with_input(BenchmarkId::new("3d_level1", size), &size, |b, _| {
            b.iter(|| black_box(downsample_3d(&input.view(), 1)))
        });

        group.bench_with_input(BenchmarkId::new("3d_level3", size), &size, |b, _| {
            b.iter(|| black_box(downsample_3d(&input.view(), 3)))
        });

        // Reused output buffer, no allocation
        let data = input.as_slice().unwrap();
        let mut out = vec![0.0f32; (*size / 2) * (*size / 2) * *size];
        group.bench_with_input(BenchmarkId::new("3d_level1_flat", size), &size, |b, &&s| {
            b.iter(|| {
                kernel::downsample3d(data, s, s, s, 1, &mut out).unwrap();
                black_box(&out);
            })
        });
    }

    group.finish();
}

fn benchmark_downsample_f16(c: &mut Criterion) {
    let mut group = c.benchmark_group("downsample_f16");

    for size in [64, 128].iter() {
        let input = Array3::from_shape_fn((*size, *size, *size), |(z, y, x)| {
            f16::from_f32(((z * 100 + y * 10 + x) % 256) as f32 / 255.0)
        });

        let voxels = (*size as u64).pow(3);
        group.throughput(Throughput::Elements(voxels));

        group.bench_with_input(BenchmarkId::new("3d_level1", size), &size, |b, _| {
            b.iter(|| black_box(downsample_3d(&input.view(), 1)))
        });
    }

    group.finish();
}

fn benchmark_upsample_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsample_f32");

    for size in [32, 64, 128].iter() {
        let input = Array3::from_shape_fn((*size, *size, *size), |(z, y, x)| {
            ((z * 100 + y * 10 + x) % 256) as f32 / 255.0
        });

        // Throughput in output voxels
        let voxels = (*size as u64).pow(3) * 4;
        group.throughput(Throughput::Elements(voxels));

        group.bench_with_input(BenchmarkId::new("3d_level1", size), &size, |b, _| {
            b.iter(|| black_box(upsample_3d(&input.view(), 1)))
        });
    }

    group.finish();
}

fn benchmark_pad(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_pad");

    let size = 256;
    let input = Array3::from_shape_fn((size / 4, size, size), |(z, y, x)| {
        ((z * 100 + y * 10 + x) % 256) as f32 / 255.0
    });
    let config = PadConfig::default();

    group.throughput(Throughput::Elements(input.len() as u64));
    group.bench_function("default_width", |b| {
        b.iter(|| black_box(apply_pad(&input.view(), &config)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_downsample_f32,
    benchmark_downsample_f16,
    benchmark_upsample_f32,
    benchmark_pad
);
criterion_main!(benches);
