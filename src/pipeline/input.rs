//! Input direction: hardware → (resampler) → queue → application.

use std::sync::Arc;

use crate::config::{StreamFormat, SAMPLE_BYTES};
use crate::format::{decode_samples, from_f32_slice, Sample};
use crate::pipeline::route::SampleRoute;
use crate::sink::QueueSink;
use crate::source::HardwareStream;
use crate::stats::PipeState;
use crate::{AudioPipeError, ByteQueue, EventCallback, PipeConfig, PipeStats};

/// Samples decoded per queue read.
const SCRATCH_SAMPLES: usize = 1024;

/// Most samples a typed [`InputPipe::read`] returns per call.
pub const MAX_TYPED_READ: usize = 2048;

/// Application half of an input pipe.
///
/// Reads block until the hardware side has delivered at least one sample,
/// then return whatever is available up to the destination length.
///
/// # Example
///
/// ```
/// use audio_pipe::{AudioPipe, FormatPreset, StreamFormat};
///
/// let (pipe, mut feeder) = AudioPipe::builder()
///     .format(FormatPreset::Custom { sample_rate: 22_050.0, channels: 2 })
///     .build_input(StreamFormat::new(44_100.0, 2))
///     .unwrap();
///
/// // The hardware callback would do this on its own thread
/// feeder.push(&[0.5; 512]);
///
/// let mut out = [0.0f32; 1024];
/// let n = pipe.read_samples(&mut out);
/// assert_eq!(n, 256);
/// ```
pub struct InputPipe {
    reader: PipeReader,
    format: StreamFormat,
    device_format: StreamFormat,
    resampling: bool,
    // Dropping the stream stops the device
    stream: Option<HardwareStream>,
}

/// Hardware half of an input pipe.
///
/// Owned by the audio callback. Each [`push`](Self::push) converts the block
/// if needed and writes it into the queue before returning.
pub struct InputFeeder {
    route: SampleRoute,
}

impl InputFeeder {
    /// Delivers one block of device samples.
    ///
    /// With [`OverflowPolicy::Block`](crate::OverflowPolicy::Block) this
    /// waits for queue space if the application is not keeping up.
    pub fn push(&mut self, samples: &[f32]) {
        self.route.push(samples);
    }

    /// Returns `true` if blocks are rate-converted before queueing.
    pub fn is_resampling(&self) -> bool {
        self.route.is_resampled()
    }
}

impl InputPipe {
    pub(crate) fn detached(
        config: &PipeConfig,
        device_format: StreamFormat,
        on_event: Option<EventCallback>,
    ) -> Result<(Self, InputFeeder), AudioPipeError> {
        config.validate()?;
        device_format.validate()?;
        let format = config.format.resolve(device_format);
        format.validate()?;

        let queue = Arc::new(ByteQueue::new(config.queue_bytes())?);
        let state = Arc::new(PipeState::new());

        let mut sink = QueueSink::new(queue.clone())
            .with_policy(config.overflow)
            .with_state(state.clone());
        if let Some(callback) = on_event {
            sink = sink.with_event_callback(callback);
        }
        let route = SampleRoute::new(sink, device_format, format, config.resampler_capacity)?;
        let resampling = route.is_resampled();

        tracing::debug!(
            device_rate = device_format.interleaved_rate(),
            app_rate = format.interleaved_rate(),
            capacity = queue.capacity(),
            resampling,
            "input pipe created"
        );

        let pipe = Self {
            reader: PipeReader { queue, state },
            format,
            device_format,
            resampling,
            stream: None,
        };
        Ok((pipe, InputFeeder { route }))
    }

    pub(crate) fn attach(&mut self, stream: HardwareStream) {
        self.stream = Some(stream);
    }

    /// Returns `true` if a hardware stream is feeding this pipe.
    pub fn is_attached(&self) -> bool {
        self.stream.is_some()
    }

    /// Application-side format of the samples this pipe returns.
    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Format the hardware delivers.
    pub fn device_format(&self) -> StreamFormat {
        self.device_format
    }

    /// Returns `true` if device samples are rate-converted.
    pub fn is_resampling(&self) -> bool {
        self.resampling
    }

    /// Returns a sendable handle for reading from this pipe.
    pub fn reader(&self) -> PipeReader {
        self.reader.clone()
    }

    /// Returns current pipe statistics.
    pub fn stats(&self) -> PipeStats {
        self.reader.state.snapshot()
    }

    /// Reads float samples. See [`PipeReader::read_samples`].
    pub fn read_samples(&self, out: &mut [f32]) -> usize {
        self.reader.read_samples(out)
    }

    /// Reads samples converted to `S`. See [`PipeReader::read`].
    pub fn read<S: Sample>(&self, out: &mut [S]) -> usize {
        self.reader.read(out)
    }

    /// Reads without blocking the async runtime. See [`PipeReader::read_async`].
    pub async fn read_async(&self, max_samples: usize) -> Result<Vec<f32>, AudioPipeError> {
        self.reader.read_async(max_samples).await
    }
}

/// Reading handle onto an input pipe's queue.
///
/// Unlike [`InputPipe`], which may own a device stream that cannot leave its
/// thread, the reader is `Send + Sync`. Clones share the queue: each sample
/// goes to exactly one of them.
#[derive(Clone)]
pub struct PipeReader {
    queue: Arc<ByteQueue>,
    state: Arc<PipeState>,
}

impl PipeReader {
    /// Reads float samples into `out`.
    ///
    /// Blocks until at least one sample is queued, then copies as many as
    /// are available, up to `out.len()`. Returns the count. An empty `out`
    /// returns 0 immediately.
    pub fn read_samples(&self, out: &mut [f32]) -> usize {
        self.read_into(out, SAMPLE_BYTES)
    }

    /// Copies whatever is queued into `out` without blocking.
    ///
    /// Returns the number of samples read, possibly 0.
    pub fn try_read_samples(&self, out: &mut [f32]) -> usize {
        self.read_into(out, 0)
    }

    fn read_into(&self, out: &mut [f32], minimum_bytes: usize) -> usize {
        let mut scratch = [0u8; SCRATCH_SAMPLES * SAMPLE_BYTES];
        let mut minimum = minimum_bytes;
        let mut count = 0;

        for block in out.chunks_mut(SCRATCH_SAMPLES) {
            let bytes = &mut scratch[..block.len() * SAMPLE_BYTES];
            let n = self.queue.read(bytes, minimum);
            // Every write and read moves whole samples
            debug_assert_eq!(n % SAMPLE_BYTES, 0);
            let samples = decode_samples(&bytes[..n], block);
            count += samples;
            if samples < block.len() {
                break;
            }
            minimum = 0;
        }

        PipeState::add(&self.state.samples_delivered, count);
        count
    }

    /// Reads samples converted to `S`.
    ///
    /// Same blocking behavior as [`read_samples`](Self::read_samples), but
    /// returns at most [`MAX_TYPED_READ`] samples per call.
    pub fn read<S: Sample>(&self, out: &mut [S]) -> usize {
        let mut floats = [0.0f32; MAX_TYPED_READ];
        let len = out.len().min(MAX_TYPED_READ);
        let n = self.read_samples(&mut floats[..len]);
        from_f32_slice(&floats[..n], out)
    }

    /// Reads up to `max_samples` without blocking the async runtime.
    ///
    /// Waiting for the first sample happens on tokio's blocking pool; the
    /// copy out of the queue happens on the calling task. Dropping the
    /// future before it completes leaves every queued sample in place for
    /// the next read.
    ///
    /// # Errors
    ///
    /// Returns `TaskFailed` if the waiting task panicked.
    pub async fn read_async(&self, max_samples: usize) -> Result<Vec<f32>, AudioPipeError> {
        if max_samples == 0 {
            return Ok(Vec::new());
        }

        let mut out = vec![0.0f32; max_samples];
        loop {
            let n = self.try_read_samples(&mut out);
            if n > 0 {
                out.truncate(n);
                return Ok(out);
            }

            // Another reader may take the samples first; then wait again
            let queue = self.queue.clone();
            tokio::task::spawn_blocking(move || queue.wait_for_at_least(SAMPLE_BYTES))
                .await
                .map_err(|e| AudioPipeError::TaskFailed(e.to_string()))?;
        }
    }

    /// Samples queued right now. Stale as soon as it returns.
    pub fn available(&self) -> usize {
        self.queue.space_used() / SAMPLE_BYTES
    }
}
