//! Output direction: application → (resampler) → queue → hardware.

use std::sync::Arc;

use crate::config::{StreamFormat, SAMPLE_BYTES};
use crate::event::emit;
use crate::format::{decode_samples, to_f32_slice, Sample};
use crate::pipeline::route::SampleRoute;
use crate::sink::QueueSink;
use crate::source::HardwareStream;
use crate::stats::PipeState;
use crate::{AudioPipeError, ByteQueue, EventCallback, PipeConfig, PipeEvent, PipeStats};

/// Samples converted per chunk on either side of the queue.
const CHUNK_SAMPLES: usize = 1024;

/// Application half of an output pipe.
///
/// Writes block while the queue is full. The hardware half never blocks: it
/// plays silence when the queue runs dry.
///
/// # Example
///
/// ```
/// use audio_pipe::{AudioPipe, StreamFormat};
///
/// let (mut pipe, mut renderer) = AudioPipe::builder()
///     .build_output(StreamFormat::new(48_000.0, 2))
///     .unwrap();
///
/// pipe.write_samples(&[0.25; 4]);
///
/// // The device callback asks for more than was written
/// let mut block = [1.0f32; 6];
/// assert_eq!(renderer.render(&mut block), 4);
/// assert_eq!(block, [0.25, 0.25, 0.25, 0.25, 0.0, 0.0]);
/// ```
pub struct OutputPipe {
    queue: Arc<ByteQueue>,
    state: Arc<PipeState>,
    route: SampleRoute,
    format: StreamFormat,
    device_format: StreamFormat,
    stream: Option<HardwareStream>,
}

impl OutputPipe {
    pub(crate) fn detached(
        config: &PipeConfig,
        device_format: StreamFormat,
        on_event: Option<EventCallback>,
    ) -> Result<(Self, OutputRenderer), AudioPipeError> {
        config.validate()?;
        device_format.validate()?;
        let format = config.format.resolve(device_format);
        format.validate()?;

        let queue = Arc::new(ByteQueue::new(config.queue_bytes())?);
        let state = Arc::new(PipeState::new());

        // The application side always blocks on a full queue
        let sink = QueueSink::new(queue.clone()).with_state(state.clone());
        let route = SampleRoute::new(sink, format, device_format, config.resampler_capacity)?;

        tracing::debug!(
            app_rate = format.interleaved_rate(),
            device_rate = device_format.interleaved_rate(),
            capacity = queue.capacity(),
            resampling = route.is_resampled(),
            "output pipe created"
        );

        let renderer = OutputRenderer {
            queue: queue.clone(),
            state: state.clone(),
            starved: true,
            on_event,
        };
        let pipe = Self {
            queue,
            state,
            route,
            format,
            device_format,
            stream: None,
        };
        Ok((pipe, renderer))
    }

    pub(crate) fn attach(&mut self, stream: HardwareStream) {
        self.stream = Some(stream);
    }

    /// Returns `true` if a hardware stream is draining this pipe.
    pub fn is_attached(&self) -> bool {
        self.stream.is_some()
    }

    /// Application-side format of the samples this pipe accepts.
    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Format the hardware consumes.
    pub fn device_format(&self) -> StreamFormat {
        self.device_format
    }

    /// Returns `true` if application samples are rate-converted.
    pub fn is_resampling(&self) -> bool {
        self.route.is_resampled()
    }

    /// Returns current pipe statistics.
    pub fn stats(&self) -> PipeStats {
        self.state.snapshot()
    }

    /// Queues float samples for playback, blocking while the queue is full.
    pub fn write_samples(&mut self, samples: &[f32]) {
        self.route.push(samples);
    }

    /// Queues samples of type `S`, converting through float in chunks.
    pub fn write<S: Sample>(&mut self, samples: &[S]) {
        let mut floats = [0.0f32; CHUNK_SAMPLES];
        for block in samples.chunks(CHUNK_SAMPLES) {
            let n = to_f32_slice(block, &mut floats);
            self.route.push(&floats[..n]);
        }
    }

    /// Blocks until the hardware has taken every queued byte.
    ///
    /// Samples still inside the resampler (less than one output sample's
    /// worth) are not counted. Waits forever if no renderer is running.
    pub fn wait_until_drained(&self) {
        self.queue.wait_until_empty();
    }
}

/// Hardware half of an output pipe.
///
/// Owned by the audio callback. [`render`](Self::render) never waits for
/// the application.
pub struct OutputRenderer {
    queue: Arc<ByteQueue>,
    state: Arc<PipeState>,
    /// Set until a callback is filled entirely with queued audio.
    starved: bool,
    on_event: Option<EventCallback>,
}

impl OutputRenderer {
    /// Fills `out` from the queue, padding any shortfall with silence.
    ///
    /// Returns the number of real samples written. A shortfall after audio
    /// has been flowing counts as an underrun and emits
    /// [`PipeEvent::Underrun`] once, until the queue catches up again.
    pub fn render(&mut self, out: &mut [f32]) -> usize {
        if out.is_empty() {
            return 0;
        }

        let mut scratch = [0u8; CHUNK_SAMPLES * SAMPLE_BYTES];
        let mut real = 0;
        for block in out.chunks_mut(CHUNK_SAMPLES) {
            let bytes = &mut scratch[..block.len() * SAMPLE_BYTES];
            let n = self.queue.read_or_silence(bytes) / SAMPLE_BYTES;
            decode_samples(bytes, block);
            real += n;
            if n < block.len() {
                break;
            }
        }
        // Silence only ever trails the real samples
        out[real..].fill(0.0);

        PipeState::add(&self.state.samples_delivered, real);

        let missing = out.len() - real;
        if missing == 0 {
            self.starved = false;
            return real;
        }

        PipeState::add(&self.state.silence_samples, missing);
        if !self.starved {
            self.starved = true;
            PipeState::add(&self.state.underruns, 1);
            tracing::warn!(missing_samples = missing, "output underrun, playing silence");
            emit(
                self.on_event.as_ref(),
                PipeEvent::Underrun {
                    missing_samples: missing,
                },
            );
        }
        real
    }
}
