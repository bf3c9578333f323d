//! Benchmarks for the block renderer, including the collector drain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sklavier::{io::AudioBuffer, runtime::SynthAudioSource, SynthConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/source");

    for &size in BLOCK_SIZES {
        let mut buffer = AudioBuffer::new(2, size);

        let (mut source, mut tx) = SynthAudioSource::new(SynthConfig::default()).unwrap();
        source.prepare_to_play(size, SAMPLE_RATE).unwrap();

        // A note pair every block keeps the collector and dispatch busy
        let mut note = 0u8;
        group.bench_with_input(BenchmarkId::new("note_per_block", size), &size, |b, &size| {
            b.iter(|| {
                let now = tx.now();
                tx.note_on(48 + note % 24, 0.8, 1, now);
                tx.note_off(48 + note % 24, 1, now + size as f64 / 2.0 / SAMPLE_RATE);
                note = note.wrapping_add(1);
                source
                    .get_next_audio_block(black_box(&mut buffer), 0, size)
                    .unwrap();
            })
        });
    }

    group.finish();
}
