//! Benchmarks for the voice bank with 1, 4 and 8 sounding notes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pulse_synth::{
    io::{midi::MidiBuffer, AudioBuffer},
    synth::VoiceBank,
    ParameterStore,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let params = ParameterStore::new();
    let midi = MidiBuffer::new();

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        for notes in [1usize, 4, 8] {
            let mut bank = VoiceBank::default();
            bank.set_sample_rate(SAMPLE_RATE);
            for note in 0..notes {
                bank.note_on(48 + 4 * note as u8, 0.8, &params);
            }

            group.bench_with_input(
                BenchmarkId::new(format!("notes_{notes}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.clear();
                        bank.dispatch(black_box(&midi), black_box(&mut buffer), &params);
                    })
                },
            );
        }
    }

    group.finish();
}
