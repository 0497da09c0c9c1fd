//! # audio-pipe
//!
//! **Note:** This crate is under active development. The API may change before 1.0.
//!
//! Blocking audio pipes between a hardware callback and an application
//! thread, with streaming sample-rate conversion in between.
//!
//! `audio-pipe` moves interleaved f32 samples through a bounded byte queue.
//! The application reads or writes at its own pace; the device callback
//! pushes or pulls at the device's cadence. When the application format
//! differs from the device format, a box-filter resampler converts in
//! transit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use audio_pipe::{AudioPipe, FormatPreset};
//!
//! let mic = AudioPipe::builder()
//!     .format(FormatPreset::Transcription) // 16kHz mono
//!     .on_event(|e| tracing::warn!(?e, "pipe event"))
//!     .open_input()?;
//!
//! let mut samples = [0i16; 1024];
//! loop {
//!     let n = mic.read(&mut samples);
//!     // Send &samples[..n] to a speech engine, a file, etc.
//!     # break;
//! }
//! # Ok::<(), audio_pipe::AudioPipeError>(())
//! ```
//!
//! ## Architecture
//!
//! Each pipe has two halves that share one [`ByteQueue`]:
//!
//! - **Input**: the device callback drives an [`InputFeeder`]; the
//!   application blocks in [`InputPipe::read_samples`] until audio arrives
//! - **Output**: the application blocks in [`OutputPipe::write_samples`]
//!   while the queue is full; the device callback drives an
//!   [`OutputRenderer`], which plays silence rather than wait
//!
//! The input callback blocks on a full queue by default. Set
//! [`OverflowPolicy::DropIncoming`] to keep it on schedule instead.

#![warn(missing_docs)]
// Audio code requires intentional numeric casts between sample formats
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless
)]
// unwrap/expect allowed in tests only
#![allow(clippy::unwrap_used)]
// These doc lints are too strict for internal implementation details
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

mod builder;
mod config;
mod error;
mod event;
pub mod format;
mod pipeline;
mod sink;
pub mod source;
mod stats;

pub use builder::{AudioPipe, PipeBuilder};
pub use config::{FormatPreset, OverflowPolicy, PipeConfig, StreamFormat, SAMPLE_BYTES};
pub use error::AudioPipeError;
pub use event::{event_callback, EventCallback, PipeEvent};
pub use format::{LinearResampler, Sample};
pub use pipeline::{
    ByteQueue, InputFeeder, InputPipe, OutputPipe, OutputRenderer, PipeReader, RingBuffer,
    MAX_TYPED_READ,
};
pub use sink::{ChannelSink, QueueSink, SampleSink};
pub use source::{
    default_input_device_name, default_output_device_name, list_input_devices,
    list_output_devices, AudioDevice, HardwareStream, MockSource,
};
pub use stats::PipeStats;
