//! Sink trait and implementations for resampler output.
//!
//! A [`SampleSink`] is any destination that can receive batches of f32
//! samples. The crate provides:
//!
//! - [`QueueSink`]: Writes samples into a [`ByteQueue`](crate::ByteQueue)
//! - [`ChannelSink`]: Sends sample batches to a tokio mpsc channel
//!
//! Closures taking `&[f32]` are sinks too, so ad-hoc destinations need no
//! wrapper type.

mod channel;
mod queue;

pub use channel::ChannelSink;
pub use queue::QueueSink;

/// A destination for converted samples.
///
/// Sinks are called synchronously from whichever thread drives the
/// resampler, which for the input direction is the hardware callback.
///
/// # Example
///
/// ```
/// use audio_pipe::{LinearResampler, SampleSink};
///
/// struct Peak(f32);
///
/// impl SampleSink for Peak {
///     fn write_samples(&mut self, samples: &[f32]) {
///         for &s in samples {
///             self.0 = self.0.max(s.abs());
///         }
///     }
/// }
///
/// let mut resampler = LinearResampler::with_sink(2.0, 1.0, Peak(0.0)).unwrap();
/// resampler.process(&[0.5, 0.5]);
/// resampler.flush();
/// ```
pub trait SampleSink: Send {
    /// Receives one batch of samples.
    fn write_samples(&mut self, samples: &[f32]);
}

impl<F> SampleSink for F
where
    F: FnMut(&[f32]) + Send,
{
    fn write_samples(&mut self, samples: &[f32]) {
        self(samples);
    }
}
