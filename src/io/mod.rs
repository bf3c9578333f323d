// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

/// Planar multichannel sample buffer.
///
/// Sized once at configuration time; the render path only writes into the
/// existing storage.
#[derive(Debug, Default, Clone)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    num_samples: usize,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
            num_samples,
        }
    }

    /// Resize storage. Allocates, so call it outside the audio callback.
    pub fn set_size(&mut self, num_channels: usize, num_samples: usize) {
        self.channels.resize_with(num_channels, Vec::new);
        for channel in &mut self.channels {
            channel.clear();
            channel.resize(num_samples, 0.0);
        }
        self.num_samples = num_samples;
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Mix `value` into `index` of every channel.
    #[inline]
    pub fn add_to_all(&mut self, index: usize, value: f32) {
        for channel in &mut self.channels {
            channel[index] += value;
        }
    }

    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    pub fn clear_region(&mut self, start: usize, len: usize) {
        for channel in &mut self.channels {
            channel[start..start + len].fill(0.0);
        }
    }

    /// Copy `[start, start + frames)` into an interleaved device buffer with
    /// `out_channels` channels. Extra device channels repeat the last source
    /// channel; missing ones are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `start + out.len() / out_channels` exceeds `num_samples()`.
    pub fn write_interleaved(&self, start: usize, out: &mut [f32], out_channels: usize) {
        if out_channels == 0 || self.channels.is_empty() {
            out.fill(0.0);
            return;
        }
        let last = self.channels.len() - 1;
        for (frame_idx, frame) in out.chunks_mut(out_channels).enumerate() {
            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample = self.channels[ch.min(last)][start + frame_idx];
            }
        }
    }
}
