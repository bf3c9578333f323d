/*
Release Tail-Off
================

When a key is released the voice does not stop dead - that would click.
Instead its output is multiplied by a tail-off factor that starts at 1.0 and
shrinks by a constant ratio every sample:

    factor[n + 1] = factor[n] * DAMPING

  Factor
    1.0 ┐╲
        │ ╲
        │  ╲_
        │    ╲__
        │       ╲___
        │           ╲______
  floor ┼──────────────────╲___ → voice freed
        └────────────────────────→ Samples

This is an exponential decay. Each sample is quieter than the last by the
same proportion, which is how struck strings and most acoustic sounds fade.

Vocabulary
----------

  factor   0.0 means "not releasing": the voice is sustaining at full level.
           Anything above 0.0 means the release is running and the value is
           the current gain.

  floor    The near-silence threshold. Once the factor falls to or below it
           the voice is considered inaudible and is freed.

How Long Does It Last?
----------------------

    samples = ln(FLOOR) / ln(DAMPING)
            = ln(0.00045) / ln(0.99955)
            ≈ 17,120 samples ≈ 0.39 s at 44.1 kHz

The length is in samples, not seconds, so the release gets shorter at higher
sample rates.
*/

/// Per-sample multiplier applied while releasing.
pub const TAIL_OFF_DAMPING: f64 = 0.99955;

/// Factor at or below which the voice is treated as silent.
pub const SILENCE_FLOOR: f64 = 0.00045;

#[derive(Debug, Clone, Copy, Default)]
pub struct TailOff {
    factor: f64,
}

impl TailOff {
    pub fn new() -> Self {
        Self { factor: 0.0 }
    }

    /// Back to sustaining.
    pub fn reset(&mut self) {
        self.factor = 0.0;
    }

    /// Start the release. Returns `false` when it was already running, in
    /// which case the current factor is left untouched.
    pub fn begin(&mut self) -> bool {
        if self.factor == 0.0 {
            self.factor = 1.0;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_decaying(&self) -> bool {
        self.factor > 0.0
    }

    /// Gain to apply to the current sample.
    #[inline]
    pub fn gain(&self) -> f64 {
        if self.is_decaying() {
            self.factor
        } else {
            1.0
        }
    }

    /// Advance one sample. Returns `false` once the factor reached the floor.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.factor *= TAIL_OFF_DAMPING;
        self.factor > SILENCE_FLOOR
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}
