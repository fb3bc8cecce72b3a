//! Benchmarks for the stitching pipeline
//!
//! Measures the feature stages separately and the pipeline end to end.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use std::time::Duration;

use pano_features::{FeatureExtractor, MatchType, Matcher};
use pano_stitch::Stitcher;

/// Blocky deterministic texture; block junctions make strong corners.
fn texture_at(x: u32, y: u32) -> u8 {
    let cell = (x / 16).wrapping_mul(53).wrapping_add((y / 16).wrapping_mul(23));
    (cell.wrapping_mul(2_654_435_761) >> 24) as u8
}

/// Create a synthetic overlapping pair with a known 50px shift
fn create_color_pair(width: u32, height: u32) -> (RgbaImage, RgbaImage) {
    let left = RgbaImage::from_fn(width, height, |x, y| {
        let v = texture_at(x, y);
        Rgba([v, v, v, 255])
    });
    let right = RgbaImage::from_fn(width, height, |x, y| {
        let v = texture_at(x + 50, y);
        Rgba([v, v, v, 255])
    });
    (left, right)
}

fn create_gray_pair(width: u32, height: u32) -> (GrayImage, GrayImage) {
    let left = GrayImage::from_fn(width, height, |x, y| Luma([texture_at(x, y)]));
    let right = GrayImage::from_fn(width, height, |x, y| Luma([texture_at(x + 50, y)]));
    (left, right)
}

fn benchmark_feature_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_extraction");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(20);

    for size in [256u32, 512, 1024] {
        let (gray, _) = create_gray_pair(size, size);
        let extractor = FeatureExtractor::default();

        group.bench_with_input(
            BenchmarkId::new("detect_and_describe", format!("{}x{}", size, size)),
            &gray,
            |b, img| {
                b.iter(|| extractor.extract(black_box(img), None).unwrap());
            },
        );
    }

    group.finish();
}

fn benchmark_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptor_matching");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(20);

    for size in [256u32, 512] {
        let (left, right) = create_gray_pair(size, size);
        let extractor = FeatureExtractor::default();
        let left_descs = extractor.extract(&left, None).unwrap();
        let right_descs = extractor.extract(&right, None).unwrap();
        let matcher = Matcher::new(MatchType::BruteForceHamming).with_distance_band(3.0);

        group.bench_with_input(
            BenchmarkId::new(
                "brute_force_hamming",
                format!("{}x{}", left_descs.len(), right_descs.len()),
            ),
            &(left_descs, right_descs),
            |b, (l, r)| {
                b.iter(|| matcher.match_descriptors(black_box(l), black_box(r)).unwrap());
            },
        );
    }

    group.finish();
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch_pipeline");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    for (width, height) in [(320u32, 240u32), (640, 480), (800, 600)] {
        let (left, right) = create_color_pair(width, height);
        let stitcher = Stitcher::default();

        group.bench_with_input(
            BenchmarkId::new("run", format!("{}x{}", width, height)),
            &(left, right),
            |b, (l, r)| {
                b.iter(|| stitcher.run(black_box(l), black_box(r)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_feature_extraction,
    benchmark_matching,
    benchmark_full_pipeline
);
criterion_main!(benches);
