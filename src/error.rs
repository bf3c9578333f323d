//! Error types for configuration and block rendering.
//!
//! Only precondition failures are errors. Running out of voices or releasing
//! a note nobody holds are normal runtime conditions and degrade silently.

use thiserror::Error;

/// Errors raised by configuration calls and render-entry precondition checks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthError {
    /// Sample rate was zero, negative or not finite
    #[error("invalid sample rate: {0}Hz")]
    InvalidSampleRate(f64),

    /// Render was requested before a sample rate was configured
    #[error("render called before prepare_to_play")]
    NotPrepared,

    /// Requested span does not fit inside the output buffer
    #[error("block [{start}, {start}+{len}) exceeds buffer of {capacity} samples")]
    BlockOutOfRange {
        start: usize,
        len: usize,
        capacity: usize,
    },

    /// Requested block is longer than the configured `max_block_size`
    #[error("block of {len} samples exceeds max_block_size {max}")]
    BlockTooLarge { len: usize, max: usize },

    /// Configuration value rejected by validation
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Result type for synth operations
pub type SynthResult<T> = Result<T, SynthError>;

/// Reject sample rates that would make pitch computation meaningless.
pub(crate) fn check_sample_rate(sample_rate: f64) -> SynthResult<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidSampleRate(sample_rate))
    }
}
