//! Engine configuration.
//!
//! Everything here is read once at construction / `prepare_to_play` time so
//! the render path never has to allocate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{check_sample_rate, SynthError, SynthResult},
    MAX_BLOCK_SIZE,
};

/// What to do with a note-on when every eligible voice is busy
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceStealing {
    /// Drop the incoming note
    #[default]
    Never,
    /// Reclaim the eligible voice that was started longest ago
    Oldest,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Number of voices in the pool
    pub voices: usize,
    /// Initial sample rate in Hz (replaced by `prepare_to_play`)
    pub sample_rate: f64,
    /// Largest block the host is expected to request
    pub max_block_size: usize,
    /// Capacity of the producer → audio event ring
    pub event_capacity: usize,
    pub stealing: VoiceStealing,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            voices: 4,
            sample_rate: 44_100.0,
            max_block_size: MAX_BLOCK_SIZE,
            event_capacity: 256,
            stealing: VoiceStealing::Never,
        }
    }
}

impl SynthConfig {
    pub fn with_voices(mut self, voices: usize) -> Self {
        self.voices = voices;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }

    pub fn with_event_capacity(mut self, event_capacity: usize) -> Self {
        self.event_capacity = event_capacity;
        self
    }

    pub fn with_stealing(mut self, stealing: VoiceStealing) -> Self {
        self.stealing = stealing;
        self
    }

    pub fn validate(&self) -> SynthResult<()> {
        if self.voices == 0 {
            return Err(SynthError::InvalidConfig("voices must be at least 1"));
        }
        if self.max_block_size == 0 {
            return Err(SynthError::InvalidConfig("max_block_size must be at least 1"));
        }
        if self.event_capacity == 0 {
            return Err(SynthError::InvalidConfig("event_capacity must be at least 1"));
        }
        check_sample_rate(self.sample_rate)
    }
}
