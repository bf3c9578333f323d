//! Benchmarks for the seven-partial oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sklavier::{dsp::HarmonicOsc, io::AudioBuffer};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_harmonic(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/harmonic");

    for &size in BLOCK_SIZES {
        // Stereo output: each sample is written to both channels
        let mut buffer = AudioBuffer::new(2, size);

        let mut sustaining = HarmonicOsc::new();
        sustaining.start(69, 1.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| {
                sustaining.render(black_box(&mut buffer), 0, size);
            })
        });

        // Restart the release each iteration so it never runs out mid-bench
        let mut releasing = HarmonicOsc::new();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, &size| {
            b.iter(|| {
                releasing.start(69, 1.0, SAMPLE_RATE);
                releasing.stop(true);
                releasing.render(black_box(&mut buffer), 0, size);
            })
        });
    }

    group.finish();
}
