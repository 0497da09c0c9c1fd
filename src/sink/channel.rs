//! Tokio mpsc channel sink implementation.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::sink::SampleSink;

/// A sink that forwards sample batches to a tokio mpsc channel.
///
/// Sending never blocks: when the channel is full the batch is dropped and
/// counted, so the sink is safe to use from a hardware callback.
///
/// # Example
///
/// ```
/// use audio_pipe::{ChannelSink, LinearResampler};
/// use tokio::sync::mpsc;
///
/// let (tx, mut rx) = mpsc::channel::<Vec<f32>>(16);
/// let mut resampler = LinearResampler::with_sink(48_000.0, 16_000.0, ChannelSink::new(tx)).unwrap();
/// resampler.process(&[0.0; 480]);
/// resampler.flush();
/// assert_eq!(rx.try_recv().unwrap().len(), 160);
/// ```
pub struct ChannelSink {
    sender: mpsc::Sender<Vec<f32>>,
    dropped_batches: u64,
}

impl ChannelSink {
    /// Creates a new channel sink with the given sender.
    pub fn new(sender: mpsc::Sender<Vec<f32>>) -> Self {
        Self {
            sender,
            dropped_batches: 0,
        }
    }

    /// Number of batches discarded because the channel was full or closed.
    pub fn dropped_batches(&self) -> u64 {
        self.dropped_batches
    }
}

impl SampleSink for ChannelSink {
    fn write_samples(&mut self, samples: &[f32]) {
        match self.sender.try_send(samples.to_vec()) {
            Ok(()) => {}
            Err(TrySendError::Full(batch)) => {
                self.dropped_batches += 1;
                tracing::warn!(samples = batch.len(), "channel sink full, dropping batch");
            }
            Err(TrySendError::Closed(_)) => {
                self.dropped_batches += 1;
                tracing::debug!("channel sink receiver closed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_sends_batches() {
        let (tx, mut rx) = mpsc::channel::<Vec<f32>>(10);
        let mut sink = ChannelSink::new(tx);

        sink.write_samples(&[1.0, 2.0, 3.0]);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, vec![1.0, 2.0, 3.0]);
        assert_eq!(sink.dropped_batches(), 0);
    }

    #[test]
    fn test_channel_sink_full() {
        let (tx, _rx) = mpsc::channel::<Vec<f32>>(1);
        let mut sink = ChannelSink::new(tx);

        sink.write_samples(&[1.0]);
        sink.write_samples(&[2.0]);

        assert_eq!(sink.dropped_batches(), 1);
    }

    #[test]
    fn test_channel_sink_closed() {
        let (tx, rx) = mpsc::channel::<Vec<f32>>(10);
        let mut sink = ChannelSink::new(tx);
        drop(rx);

        sink.write_samples(&[1.0, 2.0, 3.0]);

        assert_eq!(sink.dropped_batches(), 1);
    }
}
