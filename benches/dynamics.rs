use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dino_vis::dynamics::DynamicsExtractor;
use dino_vis::source::{FrequencySource, NoiseParams, NoiseSource};

fn bench_compute_dynamics(c: &mut Criterion) {
    let mut source = NoiseSource::new(32, 255.0, NoiseParams::default()).unwrap();
    let frames: Vec<Vec<f64>> = (0..256).filter_map(|_| source.next_frame()).collect();
    let mut extractor = DynamicsExtractor::with_frame_length(32).unwrap();

    let mut i = 0;
    c.bench_function("compute_dynamics_32_bins", |b| {
        b.iter(|| {
            let frame = &frames[i % frames.len()];
            i += 1;
            black_box(extractor.compute_dynamics(black_box(frame)).unwrap())
        })
    });

    let bytes: Vec<u8> = (0..32).map(|i| (i * 8) as u8).collect();
    c.bench_function("compute_dynamics_bytes_32_bins", |b| {
        b.iter(|| black_box(extractor.compute_dynamics_bytes(black_box(&bytes)).unwrap()))
    });
}

criterion_group!(benches, bench_compute_dynamics);
criterion_main!(benches);
