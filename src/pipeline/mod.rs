//! Pipe plumbing between a hardware callback and an application thread.
//!
//! ```text
//! input:  device callback → InputFeeder → [resampler] → ByteQueue → InputPipe
//! output: OutputPipe → [resampler] → ByteQueue → OutputRenderer → device callback
//! ```
//!
//! - **RingBuffer**: circular byte storage over `ringbuf::HeapRb`
//! - **ByteQueue**: the ring behind a mutex with "added" and "removed" signals
//! - **Route**: writes straight into the queue or through a resampler
//!
//! The input hardware half may block on a full queue (see
//! [`OverflowPolicy`](crate::OverflowPolicy)). The output hardware half never
//! blocks and plays silence instead.

mod input;
mod output;
mod queue;
mod ring_buffer;
mod route;

pub use input::{InputFeeder, InputPipe, PipeReader, MAX_TYPED_READ};
pub use output::{OutputPipe, OutputRenderer};
pub use queue::ByteQueue;
pub use ring_buffer::RingBuffer;
