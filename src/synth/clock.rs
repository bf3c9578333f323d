use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Audio-device clock shared between the render thread and producers.
///
/// Holds the host time, in seconds since the last `prepare_to_play`, at which
/// the next block will start. Only the render side writes it.
#[derive(Debug, Clone, Default)]
pub struct SampleClock {
    seconds: Arc<AtomicU64>,
}

impl SampleClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> f64 {
        f64::from_bits(self.seconds.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn set(&self, seconds: f64) {
        self.seconds.store(seconds.to_bits(), Ordering::Release);
    }
}
