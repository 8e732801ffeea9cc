//! Benchmarks for the CPU-bound parts of Logomark.
//!
//! Run with: cargo bench -p logomark-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use logomark_core::image_ops::{corner_background, extend_image, trim_image};
use logomark_core::naming::sanitize_name;

fn logo_on_white(size: u32) -> DynamicImage {
    let (from, to) = (size / 3, size * 2 / 3);
    DynamicImage::ImageRgba8(RgbaImage::from_fn(size, size, |x, y| {
        if (from..to).contains(&x) && (from..to).contains(&y) {
            Rgba([200, 16, 46, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    }))
}

fn benchmark_sanitize(c: &mut Criterion) {
    c.bench_function("sanitize_name", |b| {
        b.iter(|| sanitize_name(black_box("  The Coca-Cola Company (Atlanta, GA)!! ")))
    });
}

fn benchmark_corner_background(c: &mut Criterion) {
    let img = logo_on_white(1024).to_rgba8();

    c.bench_function("corner_background", |b| {
        b.iter(|| corner_background(black_box(&img)))
    });
}

fn benchmark_trim(c: &mut Criterion) {
    let img = logo_on_white(1024);

    c.bench_function("trim_1024px", |b| {
        b.iter(|| {
            let _ = trim_image(black_box(&img), 10);
        })
    });
}

fn benchmark_extend(c: &mut Criterion) {
    let img = logo_on_white(256);

    c.bench_function("extend_256px", |b| {
        b.iter(|| {
            let _ = extend_image(black_box(&img));
        })
    });
}

criterion_group!(
    benches,
    benchmark_sanitize,
    benchmark_corner_background,
    benchmark_trim,
    benchmark_extend,
);
criterion_main!(benches);
