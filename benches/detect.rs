use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pageseg::{DetectionConfig, RasterImage, Rect, RegionType, TemplateRegion, detect_regions};

/// A4-ish scan at 150 dpi with header, two text columns, and a footer
fn synthetic_page(width: usize, height: usize) -> RasterImage {
    let mut gray = vec![255u8; width * height];
    let mut fill = |x0: usize, y0: usize, w: usize, h: usize| {
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                gray[y * width + x] = 10;
            }
        }
    };
    fill(width / 10, height / 40, width * 8 / 10, height / 30);
    fill(width / 10, height / 8, width * 2 / 5, height * 3 / 5);
    fill(width / 2 + width / 20, height / 8, width * 2 / 5, height * 3 / 5);
    fill(width / 10, height * 9 / 10, width * 8 / 10, height / 40);
    RasterImage::from_gray8(gray, width, height)
}

fn page_templates(width: f32, height: f32) -> Vec<TemplateRegion> {
    vec![
        TemplateRegion::new(
            Rect::new(width * 0.1, 0.0, width * 0.8, height * 0.06),
            RegionType::HEADER,
        ),
        TemplateRegion::new(
            Rect::new(width * 0.1, height * 0.12, width * 0.4, height * 0.62),
            RegionType::LEFT_TEXT,
        ),
        TemplateRegion::new(
            Rect::new(width * 0.55, height * 0.12, width * 0.4, height * 0.62),
            RegionType::RIGHT_TEXT,
        ),
    ]
}

fn bench_detect_no_templates(c: &mut Criterion) {
    let page = synthetic_page(1240, 1754);
    let config = DetectionConfig::default();
    c.bench_function("detect_1240x1754_auto", |b| {
        b.iter(|| detect_regions(black_box(&page), black_box(&[]), black_box(&config)))
    });
}

fn bench_detect_with_templates(c: &mut Criterion) {
    let page = synthetic_page(1240, 1754);
    let templates = page_templates(1240.0, 1754.0);
    let config = DetectionConfig::default();
    c.bench_function("detect_1240x1754_templates", |b| {
        b.iter(|| detect_regions(black_box(&page), black_box(&templates), black_box(&config)))
    });
}

fn bench_detect_small(c: &mut Criterion) {
    let page = synthetic_page(620, 877);
    let config = DetectionConfig::default();
    c.bench_function("detect_620x877_auto", |b| {
        b.iter(|| detect_regions(black_box(&page), black_box(&[]), black_box(&config)))
    });
}

criterion_group!(
    benches,
    bench_detect_no_templates,
    bench_detect_with_templates,
    bench_detect_small
);
criterion_main!(benches);
