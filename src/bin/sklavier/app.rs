//! Sklavier - device wiring and a scripted producer

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use sklavier::{
    io::AudioBuffer, runtime::SynthAudioSource, SynthConfig, VoiceStealing, MAX_BLOCK_SIZE,
};

/// Scheduling headroom so the first events are not already late.
const LOOKAHEAD_SECONDS: f64 = 0.1;
/// Time left for the last release to ring out.
const TAIL_SECONDS: f64 = 1.0;

/// Render one device period in chunks of at most `MAX_BLOCK_SIZE` frames.
///
/// A chunk that fails to render is written as silence and counted in
/// `errors`; the callback cannot log without risking a stall.
fn fill_device_buffer(
    source: &mut SynthAudioSource,
    render_buf: &mut AudioBuffer,
    data: &mut [f32],
    channels: usize,
    errors: &AtomicU64,
) {
    let total_frames = data.len() / channels;
    let mut frames_written = 0;

    while frames_written < total_frames {
        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
        let out_off = frames_written * channels;
        let out = &mut data[out_off..out_off + frames_to_render * channels];

        match source.get_next_audio_block(render_buf, 0, frames_to_render) {
            Ok(()) => render_buf.write_interleaved(0, out, channels),
            Err(_) => {
                errors.fetch_add(1, Ordering::Relaxed);
                out.fill(0.0);
            }
        }

        frames_written += frames_to_render;
    }
}

/// Chords played back to back, each held for `step` seconds.
pub struct Phrase {
    step: f64,
    chords: Vec<Vec<u8>>,
}

impl Phrase {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            chords: Vec::new(),
        }
    }

    pub fn chord(mut self, notes: &[u8]) -> Self {
        self.chords.push(notes.to_vec());
        self
    }

    fn duration(&self) -> f64 {
        self.step * self.chords.len() as f64
    }
}

/// Main application builder
pub struct Sklavier {
    config: SynthConfig,
}

impl Sklavier {
    pub fn new() -> Self {
        Self {
            config: SynthConfig::default(),
        }
    }

    pub fn voices(mut self, voices: usize) -> Self {
        self.config = self.config.with_voices(voices);
        self
    }

    pub fn stealing(mut self, stealing: VoiceStealing) -> Self {
        self.config = self.config.with_stealing(stealing);
        self
    }

    /// Open the default output, play `phrase`, and return once it has faded.
    pub fn play(self, phrase: Phrase) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;

        let (mut source, mut sender) = SynthAudioSource::new(self.config.with_sample_rate(sample_rate))
            .wrap_err("invalid synth configuration")?;
        source
            .prepare_to_play(MAX_BLOCK_SIZE, sample_rate)
            .wrap_err("failed to prepare synth")?;

        log::info!(
            "output: {} ({} Hz, {} channels)",
            device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate,
            channels
        );

        // Stereo, like the device layout we expect most of the time; extra
        // device channels repeat the right channel.
        let mut render_buf = AudioBuffer::new(2, MAX_BLOCK_SIZE);
        let render_errors = Arc::new(AtomicU64::new(0));
        let callback_errors = Arc::clone(&render_errors);

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                fill_device_buffer(&mut source, &mut render_buf, data, channels, &callback_errors);
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )?;

        stream.play()?;

        let start = sender.now() + LOOKAHEAD_SECONDS;
        for (i, chord) in phrase.chords.iter().enumerate() {
            let on = start + i as f64 * phrase.step;
            let off = on + phrase.step;
            for &note in chord {
                sender.note_on(note, 0.8, 1, on);
                sender.note_off(note, 1, off);
            }
        }
        log::info!(
            "playing {} chords ({} events dropped)",
            phrase.chords.len(),
            sender.dropped()
        );

        let wait = LOOKAHEAD_SECONDS + phrase.duration() + TAIL_SECONDS;
        thread::sleep(Duration::from_secs_f64(wait));

        drop(stream);
        let failed = render_errors.load(Ordering::Relaxed);
        if failed > 0 {
            log::error!("{} blocks failed to render and were replaced by silence", failed);
        }
        log::info!("done");
        Ok(())
    }
}

impl Default for Sklavier {
    fn default() -> Self {
        Self::new()
    }
}
