//! Benchmarks for the full process call: keyboard drain, event splitting,
//! eight voices and the block-entry denormal flush.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pulse_synth::{
    io::{midi::MidiBuffer, midi::MidiEvent, AudioBuffer},
    Processor, ProcessorConfig,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/processor");

    for &size in BLOCK_SIZES {
        let Ok((mut processor, mut keyboard)) = Processor::new(ProcessorConfig::default()) else {
            return;
        };
        processor.prepare(SAMPLE_RATE, size);
        for note in [48, 52, 55, 59, 62, 65, 69, 72] {
            keyboard.note_on(note);
        }

        let mut buffer = AudioBuffer::new(2, size);
        let mut midi = MidiBuffer::new();

        group.bench_with_input(BenchmarkId::new("full_chord", size), &size, |b, _| {
            b.iter(|| {
                processor.process(black_box(&mut buffer), black_box(&mut midi));
            })
        });

        // A retrigger mid-block forces a split render
        group.bench_with_input(BenchmarkId::new("split_block", size), &size, |b, _| {
            b.iter(|| {
                let key = 69;
                midi.push(size / 2, MidiEvent::NoteOff { channel: 0, key, velocity: 0 });
                midi.push(size / 2, MidiEvent::NoteOn { channel: 0, key, velocity: 100 });
                processor.process(black_box(&mut buffer), black_box(&mut midi));
            })
        });
    }

    group.finish();
}
