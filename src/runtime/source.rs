//! Block renderer - the piece the audio callback talks to.
//!
//! One `SynthAudioSource` owns the voice pool and the consumer half of the
//! event channel. Every hardware period it clears the requested region,
//! collects the events due inside it, and lets the pool render.

use crate::{
    config::SynthConfig,
    error::{check_sample_rate, SynthError, SynthResult},
    io::AudioBuffer,
    synth::{
        collector::{self, MidiCollector, NoteSender},
        poly::{check_span, PolySynth},
        sound::Sound,
        SampleClock,
    },
};

pub struct SynthAudioSource {
    synth: PolySynth,
    collector: MidiCollector,
    clock: SampleClock,
    max_block_size: usize,
    /// 0.0 until `prepare_to_play`
    sample_rate: f64,
    samples_rendered: u64,
}

impl SynthAudioSource {
    /// Build the engine and the sender that feeds it.
    ///
    /// The source does not render until `prepare_to_play` has been called.
    pub fn new(config: SynthConfig) -> SynthResult<(Self, NoteSender)> {
        config.validate()?;

        let clock = SampleClock::new();
        let (sender, collector) = collector::channel(config.event_capacity, clock.clone());
        let synth = PolySynth::from_config(&config)?;

        let source = Self {
            synth,
            collector,
            clock,
            max_block_size: config.max_block_size,
            sample_rate: 0.0,
            samples_rendered: 0,
        };
        Ok((source, sender))
    }

    /// (Re)configure for a device. Restarts the clock and drops any events
    /// queued under the previous configuration.
    ///
    /// `expected_block_size` must not exceed the configured `max_block_size`;
    /// hosts with larger periods split them (see `get_next_audio_block`).
    pub fn prepare_to_play(&mut self, expected_block_size: usize, sample_rate: f64) -> SynthResult<()> {
        check_sample_rate(sample_rate)?;
        self.check_block_size(expected_block_size)?;

        self.synth.set_sample_rate(sample_rate)?;
        self.collector.clear();
        self.sample_rate = sample_rate;
        self.samples_rendered = 0;
        self.clock.set(0.0);

        log::info!(
            "prepared: {}Hz, {} voices, blocks of ~{} samples",
            sample_rate,
            self.synth.num_voices(),
            expected_block_size
        );
        Ok(())
    }

    /// Silence every voice and discard queued events.
    pub fn release_resources(&mut self) {
        self.synth.all_notes_off(0, false);
        self.collector.clear();
        log::debug!("released resources");
    }

    /// Fill `[start_sample, start_sample + num_samples)` of `buffer`.
    ///
    /// The span is checked before anything is written; on error the buffer
    /// is untouched and the clock does not advance. Spans longer than
    /// `max_block_size` are rejected with `SynthError::BlockTooLarge`.
    pub fn get_next_audio_block(
        &mut self,
        buffer: &mut AudioBuffer,
        start_sample: usize,
        num_samples: usize,
    ) -> SynthResult<()> {
        if self.sample_rate <= 0.0 {
            return Err(SynthError::NotPrepared);
        }
        self.check_block_size(num_samples)?;
        check_span(buffer, start_sample, num_samples)?;

        buffer.clear_region(start_sample, num_samples);

        let block_start = self.clock.now();
        let events = self
            .collector
            .drain_for_block(block_start, num_samples, self.sample_rate);
        self.synth
            .render_next_block(buffer, events, start_sample, num_samples)?;

        self.samples_rendered += num_samples as u64;
        self.clock
            .set(self.samples_rendered as f64 / self.sample_rate);
        Ok(())
    }

    /// Restore the single all-notes harmonic sound.
    pub fn set_using_harmonic_sound(&mut self) {
        self.synth.clear_sounds();
        self.synth.add_sound(Sound::harmonic());
    }

    pub fn clear_sounds(&mut self) {
        self.synth.clear_sounds();
    }

    /// Shared clock producers can use to stamp events.
    pub fn clock(&self) -> SampleClock {
        self.clock.clone()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Events dropped inside the collector because its pending store was
    /// full of earlier ones. Drops at the producer are counted by the sender.
    pub fn dropped_events(&self) -> u64 {
        self.collector.dropped()
    }

    fn check_block_size(&self, len: usize) -> SynthResult<()> {
        if len > self.max_block_size {
            return Err(SynthError::BlockTooLarge {
                len,
                max: self.max_block_size,
            });
        }
        Ok(())
    }

    pub fn synth(&self) -> &PolySynth {
        &self.synth
    }

    pub fn synth_mut(&mut self) -> &mut PolySynth {
        &mut self.synth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44_100.0;

    fn prepared() -> (SynthAudioSource, NoteSender) {
        let (mut source, sender) = SynthAudioSource::new(SynthConfig::default()).unwrap();
        source.prepare_to_play(256, SR).unwrap();
        (source, sender)
    }

    #[test]
    fn refuses_to_render_before_prepare() {
        let (mut source, _tx) = SynthAudioSource::new(SynthConfig::default()).unwrap();
        let mut buffer = AudioBuffer::new(2, 64);
        assert_eq!(
            source.get_next_audio_block(&mut buffer, 0, 64),
            Err(SynthError::NotPrepared)
        );
    }

    #[test]
    fn rejects_bad_sample_rate() {
        let (mut source, _tx) = SynthAudioSource::new(SynthConfig::default()).unwrap();
        assert_eq!(
            source.prepare_to_play(256, 0.0),
            Err(SynthError::InvalidSampleRate(0.0))
        );
        assert!(source.prepare_to_play(256, -48_000.0).is_err());
    }

    #[test]
    fn enforces_max_block_size() {
        let config = SynthConfig::default().with_max_block_size(128);
        let (mut source, _tx) = SynthAudioSource::new(config).unwrap();
        assert_eq!(
            source.prepare_to_play(256, SR),
            Err(SynthError::BlockTooLarge { len: 256, max: 128 })
        );
        source.prepare_to_play(128, SR).unwrap();

        let mut buffer = AudioBuffer::new(1, 256);
        buffer.channel_mut(0).fill(1.0);
        assert_eq!(
            source.get_next_audio_block(&mut buffer, 0, 129),
            Err(SynthError::BlockTooLarge { len: 129, max: 128 })
        );
        assert!(buffer.channel(0).iter().all(|&s| s == 1.0));
        assert_eq!(source.clock().now(), 0.0);

        source.get_next_audio_block(&mut buffer, 128, 128).unwrap();
        assert!(buffer.channel(0)[128..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn note_off_at_now_is_not_held_back_by_future_events() {
        let config = SynthConfig::default().with_event_capacity(2);
        let (mut source, mut tx) = SynthAudioSource::new(config).unwrap();
        source.prepare_to_play(256, SR).unwrap();
        let mut buffer = AudioBuffer::new(1, 256);

        tx.note_on(60, 1.0, 1, 0.0);
        source.get_next_audio_block(&mut buffer, 0, 256).unwrap();
        tx.note_on(72, 1.0, 1, 1.0);
        tx.note_off(72, 1, 1.5);
        source.get_next_audio_block(&mut buffer, 0, 256).unwrap();

        assert!(tx.note_off(60, 1, tx.now()));
        source.get_next_audio_block(&mut buffer, 0, 256).unwrap();

        let voice = &source.synth().voices()[0];
        assert_eq!(voice.note(), 60);
        assert!(!voice.is_key_down());
        assert_eq!(source.dropped_events(), 1);
    }

    #[test]
    fn clears_region_before_rendering() {
        let (mut source, _tx) = prepared();
        let mut buffer = AudioBuffer::new(2, 64);
        buffer.channel_mut(0).fill(1.0);
        source.get_next_audio_block(&mut buffer, 16, 32).unwrap();

        let ch = buffer.channel(0);
        assert!(ch[..16].iter().all(|&s| s == 1.0));
        assert!(ch[16..48].iter().all(|&s| s == 0.0));
        assert!(ch[48..].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn failed_block_does_not_advance_clock() {
        let (mut source, _tx) = prepared();
        let mut buffer = AudioBuffer::new(2, 64);
        assert!(source.get_next_audio_block(&mut buffer, 0, 65).is_err());
        assert_eq!(source.clock().now(), 0.0);
        source.get_next_audio_block(&mut buffer, 0, 64).unwrap();
        assert!((source.clock().now() - 64.0 / SR).abs() < 1e-12);
    }

    #[test]
    fn sender_now_lands_at_start_of_next_block() {
        let (mut source, mut tx) = prepared();
        let mut buffer = AudioBuffer::new(1, 128);
        source.get_next_audio_block(&mut buffer, 0, 128).unwrap();

        assert!(tx.note_on(69, 1.0, 1, tx.now()));
        source.get_next_audio_block(&mut buffer, 0, 128).unwrap();

        assert_eq!(buffer.channel(0)[0], 0.0);
        assert!(buffer.channel(0)[1] > 0.0);
        assert_eq!(source.synth().active_voice_count(), 1);
    }

    #[test]
    fn scheduled_event_is_sample_accurate() {
        let (mut source, mut tx) = prepared();
        tx.note_on(69, 1.0, 1, 100.0 / SR + 1e-9);

        let mut buffer = AudioBuffer::new(1, 64);
        source.get_next_audio_block(&mut buffer, 0, 64).unwrap();
        assert!(buffer.channel(0).iter().all(|&s| s == 0.0));

        source.get_next_audio_block(&mut buffer, 0, 64).unwrap();
        let ch = buffer.channel(0);
        assert!(ch[..37].iter().all(|&s| s == 0.0));
        assert!(ch[37] > 0.0);
    }

    #[test]
    fn prepare_again_drops_stale_events_and_voices() {
        let (mut source, mut tx) = prepared();
        tx.note_on(60, 1.0, 1, 0.0);
        let mut buffer = AudioBuffer::new(1, 32);
        source.get_next_audio_block(&mut buffer, 0, 32).unwrap();
        tx.note_on(64, 1.0, 1, 1.0);

        source.prepare_to_play(256, 48_000.0).unwrap();
        assert_eq!(source.synth().active_voice_count(), 0);
        assert_eq!(source.clock().now(), 0.0);
        for _ in 0..2_000 {
            source.get_next_audio_block(&mut buffer, 0, 32).unwrap();
        }
        assert_eq!(source.synth().active_voice_count(), 0);
    }

    #[test]
    fn sound_switching() {
        let (mut source, mut tx) = prepared();
        source.clear_sounds();
        tx.note_on(60, 1.0, 1, 0.0);
        let mut buffer = AudioBuffer::new(1, 32);
        source.get_next_audio_block(&mut buffer, 0, 32).unwrap();
        assert_eq!(source.synth().active_voice_count(), 0);

        source.set_using_harmonic_sound();
        tx.note_on(60, 1.0, 1, source.clock().now());
        source.get_next_audio_block(&mut buffer, 0, 32).unwrap();
        assert_eq!(source.synth().active_voice_count(), 1);
    }
}
