//! Bounded blocking byte queue.
//!
//! One mutex guards the ring; two condition variables signal "bytes added"
//! (wakes readers) and "bytes removed" (wakes writers). The lock is held only
//! while copying. Waits release it.
//!
//! There is no timeout or cancellation: if the peer never produces or
//! consumes again, a blocked call waits forever. Callers that need bounded
//! waits must layer their own timeout on top.

use parking_lot::{Condvar, Mutex};

use super::ring_buffer::RingBuffer;
use crate::AudioPipeError;

/// A fixed-capacity FIFO byte stream shared between two threads.
///
/// Writers block while the queue is full; readers block until enough bytes
/// arrive. Bytes come out exactly once, in the order they went in. There is
/// no framing.
///
/// # Example
///
/// ```
/// use audio_pipe::ByteQueue;
/// use std::sync::Arc;
///
/// let queue = Arc::new(ByteQueue::new(8).unwrap());
/// let writer = {
///     let queue = queue.clone();
///     std::thread::spawn(move || queue.write(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]))
/// };
///
/// let mut out = [0u8; 10];
/// let n = queue.read(&mut out, 10);
/// writer.join().unwrap();
/// assert_eq!(n, 10);
/// assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
/// ```
pub struct ByteQueue {
    ring: Mutex<RingBuffer>,
    data_added: Condvar,
    data_removed: Condvar,
    capacity: usize,
}

impl ByteQueue {
    /// Creates a queue holding at most `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCapacity` for zero and `AllocationFailed` if the
    /// storage cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self, AudioPipeError> {
        let ring = RingBuffer::with_capacity(capacity)?;
        Ok(Self {
            ring: Mutex::new(ring),
            data_added: Condvar::new(),
            data_removed: Condvar::new(),
            capacity,
        })
    }

    /// Total size in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes all of `data`, blocking whenever the queue is full.
    ///
    /// Large writes proceed in pieces as space frees up, so a write longer
    /// than the capacity completes once a reader drains the queue.
    pub fn write(&self, data: &[u8]) {
        let mut remaining = data;
        while !remaining.is_empty() {
            let mut ring = self.ring.lock();
            while ring.free() == 0 {
                self.data_removed.wait(&mut ring);
            }
            let n = ring.push(remaining);
            drop(ring);

            self.data_added.notify_all();
            remaining = &remaining[n..];
        }
    }

    /// Writes as much of `data` as fits without blocking.
    ///
    /// Returns the number of bytes written.
    pub fn try_write(&self, data: &[u8]) -> usize {
        let n = self.ring.lock().push(data);
        if n > 0 {
            self.data_added.notify_all();
        }
        n
    }

    /// Reads into `dest`, blocking until at least `minimum` bytes were copied.
    ///
    /// `minimum` is capped at `dest.len()`. Once the minimum is met this
    /// copies whatever else is immediately available, up to `dest.len()`,
    /// and returns the total. A `minimum` of zero never blocks.
    ///
    /// A minimum larger than the capacity is satisfied across several
    /// waits, each taking one queue's worth.
    pub fn read(&self, dest: &mut [u8], minimum: usize) -> usize {
        let minimum = minimum.min(dest.len());
        let mut copied = 0;

        loop {
            let mut ring = self.ring.lock();
            let target = (minimum - copied).min(self.capacity);
            while ring.len() < target {
                self.data_added.wait(&mut ring);
            }
            let n = ring.pop(&mut dest[copied..]);
            drop(ring);

            if n > 0 {
                self.data_removed.notify_all();
            }
            copied += n;
            if copied >= minimum {
                return copied;
            }
        }
    }

    /// Fills `dest` from the queue without blocking, padding with zeros.
    ///
    /// Returns the number of real bytes; `dest[n..]` is silence.
    pub fn read_or_silence(&self, dest: &mut [u8]) -> usize {
        let n = self.read(dest, 0);
        dest[n..].fill(0);
        n
    }

    /// Blocks until at least `n` bytes are queued and returns the count.
    ///
    /// Waiting for more than the capacity never returns.
    pub fn wait_for_at_least(&self, n: usize) -> usize {
        let mut ring = self.ring.lock();
        while ring.len() < n {
            self.data_added.wait(&mut ring);
        }
        ring.len()
    }

    /// Blocks until every queued byte has been read.
    pub fn wait_until_empty(&self) {
        let mut ring = self.ring.lock();
        while !ring.is_empty() {
            self.data_removed.wait(&mut ring);
        }
    }

    /// Bytes that could be written right now. Stale as soon as it returns.
    pub fn space_available(&self) -> usize {
        self.ring.lock().free()
    }

    /// Bytes that could be read right now. Stale as soon as it returns.
    pub fn space_used(&self) -> usize {
        self.ring.lock().len()
    }
}

impl std::fmt::Debug for ByteQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteQueue")
            .field("capacity", &self.capacity)
            .field("used", &self.space_used())
            .finish()
    }
}
