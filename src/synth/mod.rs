// Purpose: Voice management, polyphony, event hand-off
// This layer sits above the dsp primitives and manages multiple voices

pub mod clock;
pub mod collector;
pub mod message;
pub mod poly;
pub mod sound;
pub mod voice;

pub use clock::SampleClock;
pub use collector::{MidiCollector, NoteSender};
pub use message::{BlockEvent, SynthMessage};
pub use poly::PolySynth;
pub use sound::{Sound, SoundKind};
pub use voice::{Voice, VoiceState};
