//! Counters shared between the hardware and application halves of a pipe.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics about a pipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeStats {
    /// Samples pushed into the queue (after any rate conversion).
    pub samples_queued: u64,
    /// Samples taken out of the queue.
    pub samples_delivered: u64,
    /// Bytes discarded under [`OverflowPolicy::DropIncoming`](crate::OverflowPolicy::DropIncoming).
    pub dropped_bytes: u64,
    /// Number of times the output side ran dry after audio had been flowing.
    pub underruns: u64,
    /// Total samples of silence written to the output device.
    pub silence_samples: u64,
}

/// Internal state shared between a pipe and its hardware half.
#[derive(Debug, Default)]
pub(crate) struct PipeState {
    pub samples_queued: AtomicU64,
    pub samples_delivered: AtomicU64,
    pub dropped_bytes: AtomicU64,
    pub underruns: AtomicU64,
    pub silence_samples: AtomicU64,
}

impl PipeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(counter: &AtomicU64, n: usize) {
        counter.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PipeStats {
        PipeStats {
            samples_queued: self.samples_queued.load(Ordering::Relaxed),
            samples_delivered: self.samples_delivered.load(Ordering::Relaxed),
            dropped_bytes: self.dropped_bytes.load(Ordering::Relaxed),
            underruns: self.underruns.load(Ordering::Relaxed),
            silence_samples: self.silence_samples.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_state_new() {
        let state = PipeState::new();
        assert_eq!(state.snapshot(), PipeStats::default());
    }

    #[test]
    fn test_pipe_state_add() {
        let state = PipeState::new();
        PipeState::add(&state.samples_queued, 10);
        PipeState::add(&state.samples_queued, 5);
        PipeState::add(&state.underruns, 1);

        let stats = state.snapshot();
        assert_eq!(stats.samples_queued, 15);
        assert_eq!(stats.underruns, 1);
        assert_eq!(stats.samples_delivered, 0);
    }
}
