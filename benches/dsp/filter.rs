//! Benchmarks for the Butterworth low-pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pulse_synth::dsp::LowPass;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = LowPass::new();
        filter.set_control(0.5, SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // Coefficient recompute every block, as under a moving fader
        let mut swept = LowPass::new();
        let mut control = 0.0f32;
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                control = (control + 0.01) % 1.0;
                swept.track_control(black_box(control), SAMPLE_RATE);
                buffer.copy_from_slice(&input);
                swept.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
