use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pageseg::detector::classify::{classify, rgb_to_grayscale, rgba_to_grayscale};

fn bench_rgb_grayscale_small(c: &mut Criterion) {
    let rgb = vec![180u8; 100 * 100 * 3];
    c.bench_function("rgb_to_grayscale_100x100", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&rgb), black_box(100), black_box(100)))
    });
}

fn bench_rgb_grayscale_page(c: &mut Criterion) {
    let rgb = vec![180u8; 1240 * 1754 * 3];
    c.bench_function("rgb_to_grayscale_1240x1754", |b| {
        b.iter(|| rgb_to_grayscale(black_box(&rgb), black_box(1240), black_box(1754)))
    });
}

fn bench_rgba_grayscale_page(c: &mut Criterion) {
    let rgba = vec![180u8; 1240 * 1754 * 4];
    c.bench_function("rgba_to_grayscale_1240x1754", |b| {
        b.iter(|| rgba_to_grayscale(black_box(&rgba), black_box(1240), black_box(1754)))
    });
}

fn bench_classify_page(c: &mut Criterion) {
    let mut gray = vec![255u8; 1240 * 1754];
    // Dark band across the middle so the mask is not all background
    for y in 800..1000 {
        for x in 100..1140 {
            gray[y * 1240 + x] = 20;
        }
    }
    c.bench_function("classify_1240x1754", |b| {
        b.iter(|| classify(black_box(&gray), black_box(1240), black_box(1754), black_box(128)))
    });
}

criterion_group!(
    benches,
    bench_rgb_grayscale_small,
    bench_rgb_grayscale_page,
    bench_rgba_grayscale_page,
    bench_classify_page
);
criterion_main!(benches);
