//! Benchmarks for low-level DSP primitives.

mod harmonic;

pub use harmonic::bench_harmonic;
