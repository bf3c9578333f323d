/// Note-level control message consumed by the voice pool.
///
/// Channels are 1-16. `AllNotesOff { channel: 0 }` addresses every channel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: f32, channel: u8 },
    NoteOff { note: u8, channel: u8 },
    Sustain { channel: u8, down: bool },
    AllNotesOff { channel: u8 },
}

/// A message stamped with host time in seconds, as pushed by a producer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimedMessage {
    pub time: f64,
    pub message: SynthMessage,
}

/// A message positioned inside the block being rendered.
///
/// `offset` counts samples from the block's `start_sample`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlockEvent {
    pub offset: usize,
    pub message: SynthMessage,
}

impl BlockEvent {
    pub fn new(offset: usize, message: SynthMessage) -> Self {
        Self { offset, message }
    }

    pub fn note_on(offset: usize, note: u8, velocity: f32, channel: u8) -> Self {
        Self::new(
            offset,
            SynthMessage::NoteOn {
                note,
                velocity,
                channel,
            },
        )
    }

    pub fn note_off(offset: usize, note: u8, channel: u8) -> Self {
        Self::new(offset, SynthMessage::NoteOff { note, channel })
    }
}
