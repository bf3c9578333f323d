//! Benchmarks for the voice pool with every voice sounding.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sklavier::{
    io::AudioBuffer,
    synth::{BlockEvent, PolySynth},
    SynthConfig,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_poly(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/poly");

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        // === FULL CHORD: 4 sustaining voices ===
        let config = SynthConfig::default().with_sample_rate(SAMPLE_RATE);
        let mut chord = PolySynth::from_config(&config).unwrap();
        for note in [48, 55, 64, 67] {
            chord.note_on(note, 0.8, 1);
        }
        group.bench_with_input(BenchmarkId::new("4_voices", size), &size, |b, &size| {
            b.iter(|| {
                buffer.clear();
                chord
                    .render_next_block(black_box(&mut buffer), &[], 0, size)
                    .unwrap();
            })
        });

        // === SPLIT BLOCK: one retrigger per block at the midpoint ===
        // Measures the cost of splitting the span at an event.
        let mut split = PolySynth::from_config(&config.clone().with_voices(16)).unwrap();
        let events = [
            BlockEvent::note_off(size / 2, 60, 1),
            BlockEvent::note_on(size / 2, 60, 0.8, 1),
        ];
        split.note_on(60, 0.8, 1);
        group.bench_with_input(BenchmarkId::new("split_retrigger", size), &size, |b, &size| {
            b.iter(|| {
                buffer.clear();
                split
                    .render_next_block(black_box(&mut buffer), black_box(&events), 0, size)
                    .unwrap();
            })
        });
    }

    group.finish();
}
