//! Low-level DSP primitives used by the voices.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the signal math;
//! note bookkeeping and allocation live in `synth`.

/// Additive oscillator with a fixed seven-partial spectrum.
pub mod harmonic;
/// Exponential release envelope.
pub mod tail_off;

pub use harmonic::HarmonicOsc;
pub use tail_off::TailOff;
