use crate::{
    config::{SynthConfig, VoiceStealing},
    error::{check_sample_rate, SynthError, SynthResult},
    io::AudioBuffer,
    synth::{
        message::{BlockEvent, SynthMessage},
        sound::Sound,
        voice::Voice,
    },
};

const NUM_CHANNELS: usize = 16;

/// Polyphonic engine: a fixed pool of voices plus the sounds they may play.
pub struct PolySynth {
    voices: Vec<Voice>,
    sounds: Vec<Sound>,
    /// 0.0 until configured
    sample_rate: f64,
    stealing: VoiceStealing,
    sustain: [bool; NUM_CHANNELS],
    note_counter: u64,
}

impl PolySynth {
    /// Empty pool. Add voices and sounds, then set a sample rate.
    pub fn new(stealing: VoiceStealing) -> Self {
        Self {
            voices: Vec::new(),
            sounds: Vec::new(),
            sample_rate: 0.0,
            stealing,
            sustain: [false; NUM_CHANNELS],
            note_counter: 0,
        }
    }

    /// `config.voices` harmonic voices and one harmonic sound.
    pub fn from_config(config: &SynthConfig) -> SynthResult<Self> {
        config.validate()?;
        let mut synth = Self::new(config.stealing);
        for _ in 0..config.voices {
            synth.add_voice(Voice::harmonic());
        }
        synth.add_sound(Sound::harmonic());
        synth.set_sample_rate(config.sample_rate)?;
        Ok(synth)
    }

    /// Returns the index of the new voice.
    pub fn add_voice(&mut self, voice: Voice) -> usize {
        self.voices.push(voice);
        self.voices.len() - 1
    }

    pub fn add_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    /// With no sounds registered every note-on is ignored.
    pub fn clear_sounds(&mut self) {
        self.sounds.clear();
    }

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    /// Stops every voice and applies `sample_rate` to all later notes.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> SynthResult<()> {
        check_sample_rate(sample_rate)?;
        self.all_notes_off(0, false);
        self.sample_rate = sample_rate;
        Ok(())
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn stealing(&self) -> VoiceStealing {
        self.stealing
    }

    pub fn set_stealing(&mut self, stealing: VoiceStealing) {
        self.stealing = stealing;
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    pub fn num_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Start `note` on the first suitable voice. Returns the voice index, or
    /// `None` when no sound applies or no voice is available.
    pub fn note_on(&mut self, note: u8, velocity: f32, channel: u8) -> Option<usize> {
        if self.sample_rate <= 0.0 {
            return None;
        }

        for sound in &self.sounds {
            if !sound.applies_to_note(note) || !sound.applies_to_channel(channel) {
                continue;
            }
            if let Some(idx) = find_voice(&self.voices, sound, self.stealing) {
                self.note_counter += 1;
                self.voices[idx].start_note(note, velocity, channel, self.sample_rate, self.note_counter);
                return Some(idx);
            }
        }
        None
    }

    /// Release every voice holding `note` on `channel` whose key is still down.
    /// While the channel's sustain pedal is down they keep sounding until the
    /// pedal is released.
    pub fn note_off(&mut self, note: u8, channel: u8, allow_tail_off: bool) {
        let pedal_down = self.is_sustain_down(channel);
        for voice in &mut self.voices {
            if voice.is_playing(note, channel) && voice.is_key_down() {
                voice.set_key_down(false);
                if pedal_down {
                    voice.set_pedal_held(true);
                } else {
                    voice.stop_note(allow_tail_off);
                }
            }
        }
    }

    /// Stop every voice on `channel`, or on all channels when `channel` is 0.
    /// Also lifts the sustain pedal on the affected channels.
    pub fn all_notes_off(&mut self, channel: u8, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_active() && (channel == 0 || voice.channel() == channel) {
                voice.stop_note(allow_tail_off);
            }
        }
        match sustain_index(channel) {
            Some(idx) => self.sustain[idx] = false,
            None if channel == 0 => self.sustain = [false; NUM_CHANNELS],
            None => {}
        }
    }

    pub fn handle_sustain_pedal(&mut self, channel: u8, down: bool) {
        let Some(idx) = sustain_index(channel) else {
            return;
        };
        self.sustain[idx] = down;
        if down {
            return;
        }
        for voice in &mut self.voices {
            if voice.channel() == channel && voice.is_pedal_held() && !voice.is_key_down() {
                voice.set_pedal_held(false);
                voice.stop_note(true);
            }
        }
    }

    pub fn is_sustain_down(&self, channel: u8) -> bool {
        sustain_index(channel).is_some_and(|idx| self.sustain[idx])
    }

    pub fn handle_message(&mut self, message: &SynthMessage) {
        match *message {
            SynthMessage::NoteOn {
                note,
                velocity,
                channel,
            } => {
                self.note_on(note, velocity, channel);
            }
            SynthMessage::NoteOff { note, channel } => self.note_off(note, channel, true),
            SynthMessage::Sustain { channel, down } => self.handle_sustain_pedal(channel, down),
            SynthMessage::AllNotesOff { channel } => self.all_notes_off(channel, true),
        }
    }

    /// Render `[start_sample, start_sample + num_samples)` of `out`, applying
    /// each event at its offset so notes start and stop on the exact sample.
    ///
    /// Event offsets are relative to `start_sample` and expected in
    /// non-decreasing order. An event earlier than the current position is
    /// applied at the current position; offsets past the block apply after
    /// the last sample. Voices add into `out`; clearing is the caller's job.
    pub fn render_next_block(
        &mut self,
        out: &mut AudioBuffer,
        events: &[BlockEvent],
        start_sample: usize,
        num_samples: usize,
    ) -> SynthResult<()> {
        if self.sample_rate <= 0.0 {
            return Err(SynthError::NotPrepared);
        }
        check_span(out, start_sample, num_samples)?;

        let end = start_sample + num_samples;
        let mut position = start_sample;

        for event in events {
            let at = (start_sample + event.offset.min(num_samples)).max(position);
            if at > position {
                self.render_voices(out, position, at - position);
                position = at;
            }
            self.handle_message(&event.message);
        }

        if position < end {
            self.render_voices(out, position, end - position);
        }
        Ok(())
    }

    fn render_voices(&mut self, out: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        for voice in &mut self.voices {
            voice.render_block(out, start_sample, num_samples);
        }
    }
}

/// First free voice able to play `sound`, in registration order. When none is
/// free, the stealing policy decides.
fn find_voice(voices: &[Voice], sound: &Sound, stealing: VoiceStealing) -> Option<usize> {
    let free = voices
        .iter()
        .position(|v| v.is_free() && v.can_play_sound(sound));
    if free.is_some() {
        return free;
    }

    match stealing {
        VoiceStealing::Never => None,
        VoiceStealing::Oldest => voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.can_play_sound(sound))
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx),
    }
}

fn sustain_index(channel: u8) -> Option<usize> {
    (1..=NUM_CHANNELS as u8)
        .contains(&channel)
        .then(|| channel as usize - 1)
}

/// Check that a span fits the buffer before anything is written.
pub(crate) fn check_span(out: &AudioBuffer, start_sample: usize, num_samples: usize) -> SynthResult<()> {
    match start_sample.checked_add(num_samples) {
        Some(end) if end <= out.num_samples() => Ok(()),
        _ => Err(SynthError::BlockOutOfRange {
            start: start_sample,
            len: num_samples,
            capacity: out.num_samples(),
        }),
    }
}
