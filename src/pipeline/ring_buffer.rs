//! Fixed-capacity circular byte storage.
//!
//! [`RingBuffer`] wraps a non-split `ringbuf::HeapRb<u8>`, which does the
//! wraparound copies. It is not synchronized;
//! [`ByteQueue`](super::ByteQueue) keeps it behind a mutex, so the ring's
//! own lock-free producer/consumer split is never used.

use ringbuf::traits::{Consumer, Observer, Producer};
use ringbuf::HeapRb;

use crate::AudioPipeError;

/// A circular byte buffer with FIFO semantics.
pub struct RingBuffer {
    inner: HeapRb<u8>,
}

impl RingBuffer {
    /// Allocates a ring of `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCapacity` for zero and `AllocationFailed` if the
    /// storage cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self, AudioPipeError> {
        if capacity == 0 {
            return Err(AudioPipeError::InvalidCapacity { capacity });
        }

        let inner = HeapRb::<u8>::try_new(capacity)
            .map_err(|_| AudioPipeError::AllocationFailed { bytes: capacity })?;
        Ok(Self { inner })
    }

    /// Total size in bytes.
    pub fn capacity(&self) -> usize {
        self.inner.capacity().get()
    }

    /// Bytes currently held.
    pub fn len(&self) -> usize {
        self.inner.occupied_len()
    }

    /// Returns `true` if no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Bytes that can be written without overwriting unread data.
    pub fn free(&self) -> usize {
        self.inner.vacant_len()
    }

    /// Copies as much of `data` as fits.
    ///
    /// Returns the number of bytes written.
    pub fn push(&mut self, data: &[u8]) -> usize {
        let expected = data.len().min(self.free());
        let n = self.inner.push_slice(data);
        debug_assert_eq!(n, expected);
        self.debug_check();
        n
    }

    /// Moves up to `dest.len()` bytes out of the ring, oldest first.
    ///
    /// Returns the number of bytes read.
    pub fn pop(&mut self, dest: &mut [u8]) -> usize {
        let expected = dest.len().min(self.len());
        let n = self.inner.pop_slice(dest);
        debug_assert_eq!(n, expected);
        self.debug_check();
        n
    }

    fn debug_check(&self) {
        debug_assert!(self.len() <= self.capacity());
        debug_assert_eq!(self.len() + self.free(), self.capacity());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_fifo() {
        let mut ring = RingBuffer::with_capacity(8).unwrap();
        assert_eq!(ring.push(&[1, 2, 3]), 3);
        assert_eq!(ring.push(&[4, 5]), 2);

        let mut out = [0u8; 5];
        assert_eq!(ring.pop(&mut out), 5);
        assert_eq!(out, [1, 2, 3, 4, 5]);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_push_stops_at_capacity() {
        let mut ring = RingBuffer::with_capacity(4).unwrap();
        assert_eq!(ring.push(&[1, 2, 3, 4, 5, 6]), 4);
        assert_eq!(ring.free(), 0);
        assert_eq!(ring.push(&[7]), 0);
    }

    #[test]
    fn test_wraparound_preserves_order() {
        let mut ring = RingBuffer::with_capacity(5).unwrap();
        let mut out = [0u8; 3];

        ring.push(&[1, 2, 3, 4]);
        ring.pop(&mut out);
        assert_eq!(out, [1, 2, 3]);

        // The write position is 4, so this write splits across the end
        assert_eq!(ring.push(&[5, 6, 7, 8]), 4);
        assert_eq!(ring.len(), 5);

        let mut all = [0u8; 5];
        assert_eq!(ring.pop(&mut all), 5);
        assert_eq!(all, [4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pop_more_than_held() {
        let mut ring = RingBuffer::with_capacity(4).unwrap();
        ring.push(&[9, 8]);
        let mut out = [0u8; 4];
        assert_eq!(ring.pop(&mut out), 2);
        assert_eq!(&out[..2], &[9, 8]);
    }

    #[test]
    fn test_len_plus_free_is_capacity() {
        let mut ring = RingBuffer::with_capacity(7).unwrap();
        let mut out = [0u8; 3];
        for step in 0..50u8 {
            ring.push(&[step; 2]);
            assert_eq!(ring.len() + ring.free(), 7);
            if step % 2 == 0 {
                ring.pop(&mut out);
                assert_eq!(ring.len() + ring.free(), 7);
            }
        }
    }

    #[test]
    fn test_long_interleaved_stream() {
        let mut ring = RingBuffer::with_capacity(13).unwrap();
        let input: Vec<u8> = (0..=255).cycle().take(5000).collect();
        let mut output = Vec::new();
        let mut offset = 0;
        let mut buf = [0u8; 5];

        while output.len() < input.len() {
            let end = (offset + 7).min(input.len());
            offset += ring.push(&input[offset..end]);
            let n = ring.pop(&mut buf);
            output.extend_from_slice(&buf[..n]);
        }

        assert_eq!(output, input);
    }

    #[test]
    fn test_capacity_is_exact() {
        let ring = RingBuffer::with_capacity(4096 * 4).unwrap();
        assert_eq!(ring.capacity(), 4096 * 4);
        assert_eq!(ring.free(), 4096 * 4);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            RingBuffer::with_capacity(0),
            Err(AudioPipeError::InvalidCapacity { capacity: 0 })
        ));
    }
}
