//! Byte queue sink: the link between a resampler and a pipe's queue.

use std::sync::Arc;

use crate::config::SAMPLE_BYTES;
use crate::event::emit;
use crate::format::encode_samples;
use crate::sink::SampleSink;
use crate::stats::PipeState;
use crate::{ByteQueue, EventCallback, OverflowPolicy, PipeEvent};

/// Samples encoded per queue write.
const SCRATCH_SAMPLES: usize = 1024;

/// A sink that serializes samples into a [`ByteQueue`].
///
/// Under [`OverflowPolicy::Block`] each write waits for space. Under
/// [`OverflowPolicy::DropIncoming`] it writes the whole samples that fit and
/// reports the rest as an overflow.
pub struct QueueSink {
    queue: Arc<ByteQueue>,
    policy: OverflowPolicy,
    state: Arc<PipeState>,
    on_event: Option<EventCallback>,
}

impl QueueSink {
    /// Creates a blocking sink for `queue`.
    pub fn new(queue: Arc<ByteQueue>) -> Self {
        Self {
            queue,
            policy: OverflowPolicy::Block,
            state: Arc::new(PipeState::new()),
            on_event: None,
        }
    }

    /// Sets the behavior on a full queue.
    #[must_use]
    pub fn with_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the callback that receives overflow events.
    #[must_use]
    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.on_event = Some(callback);
        self
    }

    pub(crate) fn with_state(mut self, state: Arc<PipeState>) -> Self {
        self.state = state;
        self
    }

    /// Returns the queue this sink writes into.
    pub fn queue(&self) -> &Arc<ByteQueue> {
        &self.queue
    }

    fn write_bytes(&self, bytes: &[u8]) -> usize {
        match self.policy {
            OverflowPolicy::Block => {
                self.queue.write(bytes);
                bytes.len()
            }
            OverflowPolicy::DropIncoming => {
                let room = self.queue.space_available();
                let fit = bytes.len().min(room - room % SAMPLE_BYTES);
                self.queue.try_write(&bytes[..fit])
            }
        }
    }
}

impl SampleSink for QueueSink {
    fn write_samples(&mut self, samples: &[f32]) {
        let mut scratch = [0u8; SCRATCH_SAMPLES * SAMPLE_BYTES];
        let mut written = 0;
        let mut dropped = 0;

        for block in samples.chunks(SCRATCH_SAMPLES) {
            let len = encode_samples(block, &mut scratch);
            let n = self.write_bytes(&scratch[..len]);
            written += n;
            dropped += len - n;
        }

        PipeState::add(&self.state.samples_queued, written / SAMPLE_BYTES);
        if dropped > 0 {
            PipeState::add(&self.state.dropped_bytes, dropped);
            tracing::warn!(dropped_bytes = dropped, "queue full, dropping incoming audio");
            emit(
                self.on_event.as_ref(),
                PipeEvent::Overflow {
                    dropped_bytes: dropped,
                },
            );
        }
    }
}
