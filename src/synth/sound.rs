use std::ops::RangeInclusive;

/// Kind of sound a voice can generate. Voices and sounds match on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Harmonic,
}

const ALL_CHANNELS: u16 = u16::MAX;

/// Describes which notes and channels a kind of voice may play.
///
/// Holds no per-note state; the pool only asks it questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    kind: SoundKind,
    notes: RangeInclusive<u8>,
    /// Bit `n` set = MIDI channel `n + 1` accepted
    channels: u16,
}

impl Sound {
    pub fn new(kind: SoundKind) -> Self {
        Self {
            kind,
            notes: 0..=127,
            channels: ALL_CHANNELS,
        }
    }

    /// The harmonic sound on every note and channel.
    pub fn harmonic() -> Self {
        Self::new(SoundKind::Harmonic)
    }

    pub fn with_notes(mut self, notes: RangeInclusive<u8>) -> Self {
        self.notes = notes;
        self
    }

    /// Restrict to the given channels (1-16). Out-of-range entries are ignored.
    pub fn with_channels(mut self, channels: &[u8]) -> Self {
        self.channels = channels
            .iter()
            .filter(|&&ch| (1..=16).contains(&ch))
            .fold(0, |mask, &ch| mask | 1 << (ch - 1));
        self
    }

    pub fn kind(&self) -> SoundKind {
        self.kind
    }

    pub fn applies_to_note(&self, note: u8) -> bool {
        self.notes.contains(&note)
    }

    pub fn applies_to_channel(&self, channel: u8) -> bool {
        if self.channels == ALL_CHANNELS {
            return true;
        }
        (1..=16).contains(&channel) && self.channels & (1 << (channel - 1)) != 0
    }
}
