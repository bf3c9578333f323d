use crate::{
    dsp::harmonic::HarmonicOsc,
    io::AudioBuffer,
    synth::sound::{Sound, SoundKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Playing, sustaining at full level
    Releasing, // Key released, tail-off running
}

/// Sound generator inside a voice. One variant per `SoundKind`.
#[derive(Debug, Clone)]
pub enum Generator {
    Harmonic(HarmonicOsc),
}

impl Generator {
    fn kind(&self) -> SoundKind {
        match self {
            Generator::Harmonic(_) => SoundKind::Harmonic,
        }
    }

    fn start(&mut self, note: u8, velocity: f32, sample_rate: f64) {
        match self {
            Generator::Harmonic(osc) => osc.start(note, velocity, sample_rate),
        }
    }

    fn stop(&mut self, allow_tail_off: bool) {
        match self {
            Generator::Harmonic(osc) => osc.stop(allow_tail_off),
        }
    }

    fn render(&mut self, out: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        match self {
            Generator::Harmonic(osc) => osc.render(out, start_sample, num_samples),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Generator::Harmonic(osc) => osc.is_active(),
        }
    }

    fn is_decaying(&self) -> bool {
        match self {
            Generator::Harmonic(osc) => osc.is_decaying(),
        }
    }
}

/// A single voice: one generator plus the note it is assigned to.
#[derive(Debug, Clone)]
pub struct Voice {
    note: u8,
    channel: u8,
    key_down: bool,
    pedal_held: bool,
    age: u64,
    generator: Generator,
}

impl Voice {
    pub fn new(generator: Generator) -> Self {
        Self {
            note: 0,
            channel: 0,
            key_down: false,
            pedal_held: false,
            age: 0,
            generator,
        }
    }

    pub fn harmonic() -> Self {
        Self::new(Generator::Harmonic(HarmonicOsc::new()))
    }

    pub fn can_play_sound(&self, sound: &Sound) -> bool {
        self.generator.kind() == sound.kind()
    }

    pub fn start_note(&mut self, note: u8, velocity: f32, channel: u8, sample_rate: f64, age: u64) {
        self.note = note;
        self.channel = channel;
        self.key_down = true;
        self.pedal_held = false;
        self.age = age;
        self.generator.start(note, velocity, sample_rate);
    }

    pub fn stop_note(&mut self, allow_tail_off: bool) {
        self.generator.stop(allow_tail_off);
        self.clear_if_finished();
    }

    /// Caller guarantees the span lies inside `out`.
    pub(crate) fn render_block(&mut self, out: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        self.generator.render(out, start_sample, num_samples);
        self.clear_if_finished();
    }

    pub fn state(&self) -> VoiceState {
        if !self.generator.is_active() {
            VoiceState::Free
        } else if self.generator.is_decaying() {
            VoiceState::Releasing
        } else {
            VoiceState::Active
        }
    }

    pub fn is_free(&self) -> bool {
        self.state() == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state(), VoiceState::Active | VoiceState::Releasing)
    }

    /// True while this voice sounds `note` on `channel`.
    pub fn is_playing(&self, note: u8, channel: u8) -> bool {
        self.is_active() && self.note == note && self.channel == channel
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn is_key_down(&self) -> bool {
        self.key_down
    }

    pub(crate) fn set_key_down(&mut self, down: bool) {
        self.key_down = down;
    }

    pub fn is_pedal_held(&self) -> bool {
        self.pedal_held
    }

    pub(crate) fn set_pedal_held(&mut self, held: bool) {
        self.pedal_held = held;
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    fn clear_if_finished(&mut self) {
        if !self.generator.is_active() {
            self.key_down = false;
            self.pedal_held = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44_100.0;

    fn tail_off(voice: &Voice) -> f64 {
        match voice.generator() {
            Generator::Harmonic(osc) => osc.tail_off(),
        }
    }

    #[test]
    fn lifecycle() {
        let mut voice = Voice::harmonic();
        assert!(voice.is_free());

        voice.start_note(64, 0.5, 1, SR, 1);
        assert_eq!(voice.state(), VoiceState::Active);
        assert!(voice.is_playing(64, 1));
        assert!(!voice.is_playing(64, 2));

        voice.stop_note(true);
        assert_eq!(voice.state(), VoiceState::Releasing);

        voice.stop_note(false);
        assert!(voice.is_free());
        assert!(!voice.is_playing(64, 1));
    }

    #[test]
    fn second_tail_off_request_keeps_decay_progress() {
        let mut voice = Voice::harmonic();
        voice.start_note(69, 1.0, 1, SR, 1);
        voice.stop_note(true);
        assert_eq!(tail_off(&voice), 1.0);

        let mut buffer = AudioBuffer::new(1, 64);
        voice.render_block(&mut buffer, 0, 64);
        let decayed = tail_off(&voice);
        assert!(decayed < 1.0);

        voice.stop_note(true);
        assert_eq!(tail_off(&voice), decayed);
    }

    #[test]
    fn voice_frees_itself_when_release_finishes() {
        let mut voice = Voice::harmonic();
        voice.start_note(69, 1.0, 1, SR, 1);
        voice.stop_note(true);

        let mut buffer = AudioBuffer::new(1, 512);
        let mut blocks = 0;
        while voice.is_active() {
            buffer.clear();
            voice.render_block(&mut buffer, 0, 512);
            blocks += 1;
            assert!(blocks < 40);
        }
        assert!(voice.is_free());
        assert!(!voice.is_key_down());
    }

    #[test]
    fn matches_sound_by_kind() {
        let voice = Voice::harmonic();
        assert!(voice.can_play_sound(&Sound::harmonic()));
        assert!(voice.can_play_sound(&Sound::harmonic().with_notes(0..=10)));
    }
}
