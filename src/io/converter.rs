use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

const CC_SUSTAIN: u8 = 64;
const CC_ALL_SOUND_OFF: u8 = 120;
const CC_ALL_NOTES_OFF: u8 = 123;

/// Map a decoded MIDI message onto the engine's note vocabulary.
///
/// Pitch bend, program change and controllers other than sustain and the
/// all-notes/all-sound-off pair are accepted and ignored.
pub fn midi_to_synth(midi: MidiEvent) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } => Some(SynthMessage::NoteOn {
            note: key,
            velocity: velocity_from_midi(velocity),
            channel,
        }),
        MidiEvent::NoteOff { channel, key, .. } => Some(SynthMessage::NoteOff { note: key, channel }),
        MidiEvent::ControlChange {
            channel,
            controller: CC_SUSTAIN,
            value,
        } => Some(SynthMessage::Sustain {
            channel,
            down: value >= 64,
        }),
        MidiEvent::ControlChange {
            channel,
            controller: CC_ALL_SOUND_OFF | CC_ALL_NOTES_OFF,
            ..
        } => Some(SynthMessage::AllNotesOff { channel }),
        MidiEvent::ControlChange { .. } | MidiEvent::PitchBend { .. } | MidiEvent::ProgramChange { .. } => None,
    }
}

/// MIDI velocity 0-127 to 0.0-1.0.
#[inline]
pub fn velocity_from_midi(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}

/// Equal-tempered pitch of a MIDI note. A4 = 440 Hz = MIDI note 69.
#[inline]
pub fn midi_note_to_freq(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((note as f64 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_frequencies() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-9);
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-9);
        assert!((midi_note_to_freq(57) - 220.0).abs() < 1e-9);
        assert!((midi_note_to_freq(60) - 261.625_565_300_6).abs() < 1e-6);
    }

    #[test]
    fn every_note_follows_twelve_tone_mapping() {
        for note in 0..=127u8 {
            let expected = 440.0 * 2f64.powf((note as f64 - 69.0) / 12.0);
            assert!((midi_note_to_freq(note) - expected).abs() <= expected * 1e-12);
        }
    }

    #[test]
    fn converts_note_messages() {
        let on = midi_to_synth(MidiEvent::NoteOn {
            channel: 2,
            key: 60,
            velocity: 127,
        });
        assert_eq!(
            on,
            Some(SynthMessage::NoteOn {
                note: 60,
                velocity: 1.0,
                channel: 2
            })
        );

        let off = midi_to_synth(MidiEvent::NoteOff {
            channel: 2,
            key: 60,
            velocity: 0,
        });
        assert_eq!(off, Some(SynthMessage::NoteOff { note: 60, channel: 2 }));
    }

    #[test]
    fn controllers() {
        let pedal = midi_to_synth(MidiEvent::ControlChange {
            channel: 1,
            controller: 64,
            value: 127,
        });
        assert_eq!(pedal, Some(SynthMessage::Sustain { channel: 1, down: true }));

        let panic = midi_to_synth(MidiEvent::ControlChange {
            channel: 3,
            controller: 123,
            value: 0,
        });
        assert_eq!(panic, Some(SynthMessage::AllNotesOff { channel: 3 }));

        let mod_wheel = midi_to_synth(MidiEvent::ControlChange {
            channel: 1,
            controller: 1,
            value: 90,
        });
        assert_eq!(mod_wheel, None);
        assert_eq!(midi_to_synth(MidiEvent::PitchBend { channel: 1, value: 100 }), None);
    }
}
