use std::f64::consts::TAU;

use crate::{dsp::tail_off::TailOff, io::converter::midi_note_to_freq, io::AudioBuffer};

/*
Harmonic Oscillator
===================

An additive oscillator: the fundamental plus six overtones, each a sine at an
integer multiple of the phase with a fixed, falling weight.

    value(θ) = sin θ + sin 2θ / 2 + sin 3θ / 5 + sin 4θ / 10
             + sin 5θ / 50 + sin 6θ / 80 + sin 7θ / 100

The 2nd and 3rd partials dominate the colour; the top three only add a little
edge. Because every partial is an integer multiple of θ, the waveform repeats
every 2π and θ can be wrapped without changing the output.

Level is velocity × 0.15 so four full-velocity voices stay well below clipping
in the common case.
*/

/// Amplitude per unit of velocity.
pub const VELOCITY_SENSITIVITY: f64 = 0.15;

/// (multiple of the phase, divisor) for each partial.
const PARTIALS: [(f64, f64); 7] = [
    (1.0, 1.0),
    (2.0, 2.0),
    (3.0, 5.0),
    (4.0, 10.0),
    (5.0, 50.0),
    (6.0, 80.0),
    (7.0, 100.0),
];

/// Weighted sum of all partials at phase `theta`.
#[inline]
pub fn harmonic_sum(theta: f64) -> f64 {
    PARTIALS
        .iter()
        .map(|&(multiple, divisor)| (multiple * theta).sin() / divisor)
        .sum()
}

#[derive(Debug, Clone, Default)]
pub struct HarmonicOsc {
    angle: f64,
    angle_delta: f64,
    level: f64,
    tail: TailOff,
}

impl HarmonicOsc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, note: u8, velocity: f32, sample_rate: f64) {
        self.angle = 0.0;
        self.level = velocity as f64 * VELOCITY_SENSITIVITY;
        self.tail.reset();

        let cycles_per_sample = midi_note_to_freq(note) / sample_rate;
        self.angle_delta = cycles_per_sample * TAU;
    }

    pub fn stop(&mut self, allow_tail_off: bool) {
        if allow_tail_off {
            self.tail.begin();
        } else {
            self.silence();
        }
    }

    /// Add `num_samples` of output into every channel of `out`, starting at
    /// `start_sample`. Stops early if the release reaches silence.
    ///
    /// # Panics
    ///
    /// Panics if `start_sample + num_samples` exceeds `out.num_samples()`.
    /// `PolySynth::render_next_block` checks the span before calling in.
    pub fn render(&mut self, out: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        if !self.is_active() {
            return;
        }

        for index in start_sample..start_sample + num_samples {
            let value = harmonic_sum(self.angle) * self.level * self.tail.gain();
            out.add_to_all(index, value as f32);

            self.angle += self.angle_delta;
            if self.angle >= TAU {
                self.angle %= TAU;
            }

            if self.tail.is_decaying() && !self.tail.advance() {
                self.silence();
                break;
            }
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.angle_delta != 0.0
    }

    pub fn is_decaying(&self) -> bool {
        self.tail.is_decaying()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angle_delta(&self) -> f64 {
        self.angle_delta
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Current release factor (0.0 while sustaining).
    pub fn tail_off(&self) -> f64 {
        self.tail.factor()
    }

    /// Pitch implied by the phase increment.
    pub fn frequency(&self, sample_rate: f64) -> f64 {
        self.angle_delta * sample_rate / TAU
    }

    fn silence(&mut self) {
        self.angle_delta = 0.0;
        self.tail.reset();
    }
}
