//! Benchmarks for the feedback-FM saw and the pulse built from two of them.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pulse_synth::dsp::{PulseOscillator, SawCore};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // One sin() per sample plus the feedback update
        let mut saw = SawCore::new();
        saw.set_frequency(440.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("saw", size), &size, |b, _| {
            b.iter(|| {
                saw.render(black_box(&mut buffer));
            })
        });

        // Two saws per sample
        let mut pulse = PulseOscillator::new();
        pulse.set_frequency(440.0, SAMPLE_RATE);
        pulse.set_pulse_width(0.5);
        group.bench_with_input(BenchmarkId::new("pulse", size), &size, |b, _| {
            b.iter(|| {
                pulse.render(black_box(&mut buffer));
            })
        });

        // Low notes run the strongest feedback
        let mut low = PulseOscillator::new();
        low.set_frequency(32.7, SAMPLE_RATE);
        low.set_pulse_width(0.1);
        group.bench_with_input(BenchmarkId::new("pulse_low_narrow", size), &size, |b, _| {
            b.iter(|| {
                low.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
