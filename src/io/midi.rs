/// MIDI 1.0 channel-voice message. Channels are numbered 1-16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode a raw message as delivered by a MIDI input callback.
    ///
    /// Note-on with velocity 0 is reported as note-off. System messages,
    /// running status and truncated messages yield `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status < 0x80 || status >= 0xF0 {
            return None;
        }
        let channel = (status & 0x0F) + 1;
        let data_at = |i: usize| data.get(i).copied().filter(|b| *b < 0x80);

        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data_at(0)?,
                velocity: data_at(1)?,
            }),
            0x90 => {
                let key = data_at(0)?;
                let velocity = data_at(1)?;
                if velocity == 0 {
                    Some(MidiEvent::NoteOff {
                        channel,
                        key,
                        velocity: 64,
                    })
                } else {
                    Some(MidiEvent::NoteOn {
                        channel,
                        key,
                        velocity,
                    })
                }
            }
            0xB0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data_at(0)?,
                value: data_at(1)?,
            }),
            0xC0 => Some(MidiEvent::ProgramChange {
                channel,
                program: data_at(0)?,
            }),
            0xE0 => {
                let lsb = data_at(0)? as i16;
                let msb = data_at(1)? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                })
            }
            _ => None,
        }
    }
}
