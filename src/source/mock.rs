//! Synthetic audio for exercising pipes without hardware.

use std::time::Duration;

use crate::{InputFeeder, StreamFormat};

/// Generates interleaved f32 audio in a device format.
///
/// Pair it with a detached pipe to stand in for a device callback.
///
/// # Example
///
/// ```
/// use audio_pipe::{source::MockSource, StreamFormat};
///
/// let mut mock = MockSource::new(StreamFormat::new(16_000.0, 1));
///
/// // 100ms of silence, then 100ms of a 440Hz tone
/// mock.generate_silence(100);
/// mock.generate_sine(440.0, 100);
///
/// assert_eq!(mock.take_samples().len(), 3200);
/// ```
pub struct MockSource {
    format: StreamFormat,
    samples: Vec<f32>,
}

impl MockSource {
    /// Creates an empty source producing `format`.
    pub fn new(format: StreamFormat) -> Self {
        Self {
            format,
            samples: Vec::new(),
        }
    }

    /// Format of the generated samples.
    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Appends silence.
    pub fn generate_silence(&mut self, duration_ms: u64) {
        self.generate_constant(0.0, duration_ms);
    }

    /// Appends the same value on every channel.
    pub fn generate_constant(&mut self, value: f32, duration_ms: u64) {
        let n = self.frames_for(duration_ms) * usize::from(self.format.channels);
        self.samples.extend(std::iter::repeat(value).take(n));
    }

    /// Appends a full-scale sine wave, identical on every channel.
    pub fn generate_sine(&mut self, frequency: f64, duration_ms: u64) {
        let frames = self.frames_for(duration_ms);
        let step = 2.0 * std::f64::consts::PI * frequency / self.format.sample_rate;

        for i in 0..frames {
            let value = (step * i as f64).sin() as f32;
            for _ in 0..self.format.channels {
                self.samples.push(value);
            }
        }
    }

    /// Appends raw interleaved samples.
    pub fn add_samples(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
    }

    /// Takes all generated samples, leaving the source empty.
    pub fn take_samples(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.samples)
    }

    /// Returns the generated samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Playback length of the generated samples.
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / usize::from(self.format.channels);
        Duration::from_secs_f64(frames as f64 / self.format.sample_rate)
    }

    /// Pushes the generated samples into `feeder` in blocks of
    /// `block_samples`, the way a device callback would, and empties the
    /// source.
    pub fn feed(&mut self, feeder: &mut InputFeeder, block_samples: usize) {
        for block in self.samples.chunks(block_samples.max(1)) {
            feeder.push(block);
        }
        self.samples.clear();
    }

    fn frames_for(&self, duration_ms: u64) -> usize {
        (self.format.sample_rate * duration_ms as f64 / 1000.0) as usize
    }
}
