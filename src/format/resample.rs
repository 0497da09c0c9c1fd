//! Streaming sample rate conversion.
//!
//! [`LinearResampler`] is a box filter: every output sample is the average of
//! the input it overlaps in time. There is no anti-aliasing filter, so it is
//! only suitable for coarse rate changes, but it is exact on DC and carries
//! its state across calls, so input can arrive in blocks of any size.
//!
//! Time is measured in units where one input sample lasts `output_rate`
//! units and one output sample lasts `input_rate` units. Integer-valued rates
//! keep the bookkeeping exact in `f64`.

use crate::sink::SampleSink;
use crate::AudioPipeError;

/// Initial number of output samples staged before delivery or growth.
pub const DEFAULT_CAPACITY: usize = 2048;

/// Stateful box-filter resampler.
///
/// Output accumulates in a staging buffer. What happens when that buffer
/// fills depends on how the resampler was built:
///
/// - [`with_sink`](Self::with_sink): the batch is handed to the sink and
///   staging restarts from empty.
/// - [`growable`](Self::growable): the buffer doubles and keeps everything.
///   Nothing bounds its memory; drain it with
///   [`take_available`](Self::take_available).
///
/// The resampler is not thread-safe. One instance serves one direction and
/// is driven by one thread at a time.
///
/// # Example
///
/// ```
/// use audio_pipe::LinearResampler;
///
/// let mut resampler = LinearResampler::growable(2.0, 1.0).unwrap();
/// resampler.process(&[2.0, 4.0]);
/// assert_eq!(resampler.available(), &[3.0]);
/// ```
pub struct LinearResampler {
    input_rate: f64,
    output_rate: f64,
    /// Units still needed to complete the output sample under construction.
    time_remaining: f64,
    /// Weighted sum (value × units) of the output sample under construction.
    accumulator: f64,
    pending: Vec<f32>,
    capacity: usize,
    sink: Option<Box<dyn SampleSink>>,
}

impl LinearResampler {
    /// Creates a resampler that delivers full batches to `sink`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSampleRate` if either rate is zero, negative or not
    /// finite.
    pub fn with_sink<S>(input_rate: f64, output_rate: f64, sink: S) -> Result<Self, AudioPipeError>
    where
        S: SampleSink + 'static,
    {
        Self::build(input_rate, output_rate, Some(Box::new(sink)))
    }

    /// Creates a resampler with no sink whose staging buffer grows without bound.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSampleRate` if either rate is zero, negative or not
    /// finite.
    pub fn growable(input_rate: f64, output_rate: f64) -> Result<Self, AudioPipeError> {
        Self::build(input_rate, output_rate, None)
    }

    fn build(
        input_rate: f64,
        output_rate: f64,
        sink: Option<Box<dyn SampleSink>>,
    ) -> Result<Self, AudioPipeError> {
        for rate in [input_rate, output_rate] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(AudioPipeError::InvalidSampleRate { rate });
            }
        }

        Ok(Self {
            input_rate,
            output_rate,
            time_remaining: input_rate,
            accumulator: 0.0,
            pending: Vec::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
            sink,
        })
    }

    /// Returns the input sample rate.
    pub fn input_rate(&self) -> f64 {
        self.input_rate
    }

    /// Returns the output sample rate.
    pub fn output_rate(&self) -> f64 {
        self.output_rate
    }

    /// Returns the staging capacity in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if output is delivered to a sink.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Converts a block of input samples.
    ///
    /// Completed output samples are staged; a partially built output sample
    /// carries over to the next call.
    pub fn process(&mut self, input: &[f32]) {
        for &sample in input {
            let sample = f64::from(sample);
            let mut need = self.output_rate;

            while self.time_remaining <= need {
                self.accumulator += sample * self.time_remaining;
                need -= self.time_remaining;
                self.emit((self.accumulator / self.input_rate) as f32);
                self.accumulator = 0.0;
                self.time_remaining = self.input_rate;
            }

            if need > 0.0 {
                self.accumulator += sample * need;
                self.time_remaining -= need;
            }
        }
    }

    fn emit(&mut self, value: f32) {
        if self.pending.len() >= self.capacity {
            match self.sink.as_mut() {
                Some(sink) => {
                    sink.write_samples(&self.pending);
                    self.pending.clear();
                }
                None => {
                    self.capacity *= 2;
                    self.pending.reserve(self.capacity - self.pending.len());
                    tracing::trace!(capacity = self.capacity, "resampler staging buffer grew");
                }
            }
        }
        self.pending.push(value);
    }

    /// Delivers all staged output to the sink, even if the buffer is not full.
    ///
    /// Does nothing when nothing is staged, and does nothing on a growable
    /// resampler (its output stays available).
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.write_samples(&self.pending);
            self.pending.clear();
        }
    }

    /// Changes the staging capacity.
    ///
    /// Shrinking below the staged count flushes first so no output is lost.
    /// A growable resampler never shrinks below what it currently holds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCapacity` if `capacity` is zero.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), AudioPipeError> {
        if capacity == 0 {
            return Err(AudioPipeError::InvalidCapacity { capacity });
        }
        if capacity < self.pending.len() {
            self.flush();
        }
        self.capacity = capacity.max(self.pending.len());
        if self.pending.capacity() < self.capacity {
            self.pending.reserve(self.capacity - self.pending.len());
        } else {
            self.pending.shrink_to(self.capacity);
        }
        Ok(())
    }

    /// Returns the staged output that has not been delivered.
    pub fn available(&self) -> &[f32] {
        &self.pending
    }

    /// Discards the staged output.
    pub fn clear_available(&mut self) {
        self.pending.clear();
    }

    /// Removes and returns the staged output.
    pub fn take_available(&mut self) -> Vec<f32> {
        std::mem::replace(&mut self.pending, Vec::with_capacity(self.capacity))
    }
}

impl std::fmt::Debug for LinearResampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearResampler")
            .field("input_rate", &self.input_rate)
            .field("output_rate", &self.output_rate)
            .field("pending", &self.pending.len())
            .field("capacity", &self.capacity)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}
