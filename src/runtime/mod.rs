//! Host-facing driver.
//!
//! This module provides `SynthAudioSource`, the object an audio callback
//! drives once per hardware period.
//!
//! # Example
//!
//! ```ignore
//! use sklavier::{io::AudioBuffer, runtime::SynthAudioSource, SynthConfig};
//!
//! let (mut source, mut sender) = SynthAudioSource::new(SynthConfig::default())?;
//! source.prepare_to_play(512, 48_000.0)?;
//!
//! // Input thread
//! sender.note_on(60, 0.8, 1, sender.now());
//!
//! // Audio callback
//! let mut buffer = AudioBuffer::new(2, 512);
//! source.get_next_audio_block(&mut buffer, 0, 512)?;
//! ```

mod source;

pub use source::SynthAudioSource;
