pub mod config;
pub mod dsp; // Oscillator and release math
pub mod error;
pub mod io;
pub mod runtime; // Per-callback block renderer
pub mod synth; // Voice management and polyphony

pub use config::{SynthConfig, VoiceStealing};
pub use error::{SynthError, SynthResult};

pub const MAX_BLOCK_SIZE: usize = 2048;
