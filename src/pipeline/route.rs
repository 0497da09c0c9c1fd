//! Path from a sample producer into a pipe's queue.

use crate::config::StreamFormat;
use crate::sink::{QueueSink, SampleSink};
use crate::{AudioPipeError, LinearResampler};

/// Either writes samples straight into the queue or converts them first.
pub(crate) enum SampleRoute {
    Direct(QueueSink),
    Resampled(LinearResampler),
}

impl SampleRoute {
    /// Builds a route converting from `from` to `to`.
    ///
    /// A resampler is only inserted when the interleaved rates differ.
    #[allow(clippy::float_cmp)]
    pub fn new(
        sink: QueueSink,
        from: StreamFormat,
        to: StreamFormat,
        staging: usize,
    ) -> Result<Self, AudioPipeError> {
        let input_rate = from.interleaved_rate();
        let output_rate = to.interleaved_rate();

        if input_rate == output_rate {
            return Ok(Self::Direct(sink));
        }

        let mut resampler = LinearResampler::with_sink(input_rate, output_rate, sink)?;
        resampler.set_capacity(staging)?;
        Ok(Self::Resampled(resampler))
    }

    /// Pushes one block through the route.
    ///
    /// Resampled output is flushed immediately, bounding latency to one block.
    pub fn push(&mut self, samples: &[f32]) {
        match self {
            Self::Direct(sink) => sink.write_samples(samples),
            Self::Resampled(resampler) => {
                resampler.process(samples);
                resampler.flush();
            }
        }
    }

    pub fn is_resampled(&self) -> bool {
        matches!(self, Self::Resampled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ByteQueue;
    use std::sync::Arc;

    #[test]
    fn test_equal_rates_route_direct() {
        let queue = Arc::new(ByteQueue::new(64).unwrap());
        let route = SampleRoute::new(
            QueueSink::new(queue),
            StreamFormat::new(22_050.0, 2),
            StreamFormat::new(44_100.0, 1),
            16,
        )
        .unwrap();
        assert!(!route.is_resampled());
    }

    #[test]
    fn test_resampled_route_flushes_every_push() {
        let queue = Arc::new(ByteQueue::new(64).unwrap());
        let mut route = SampleRoute::new(
            QueueSink::new(queue.clone()),
            StreamFormat::new(2.0, 1),
            StreamFormat::new(1.0, 1),
            16,
        )
        .unwrap();
        assert!(route.is_resampled());

        route.push(&[1.0, 3.0, 5.0]);
        // One complete output sample reaches the queue; the half-built one stays behind
        assert_eq!(queue.space_used(), 4);
    }
}
