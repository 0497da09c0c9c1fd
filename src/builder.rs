//! Builder pattern for `AudioPipe`.

use crate::source::AudioDevice;
use crate::{
    event_callback, AudioPipeError, EventCallback, FormatPreset, InputFeeder, InputPipe,
    OutputPipe, OutputRenderer, OverflowPolicy, PipeConfig, PipeEvent, StreamFormat,
};

/// Builder for input and output pipes.
///
/// Use [`AudioPipe::builder()`] to create one. A builder either opens a real
/// device ([`open_input`](Self::open_input), [`open_output`](Self::open_output))
/// or returns a detached pipe together with its hardware half, for callers
/// that drive the callback themselves ([`build_input`](Self::build_input),
/// [`build_output`](Self::build_output)).
///
/// # Example
///
/// ```no_run
/// use audio_pipe::{AudioPipe, FormatPreset};
///
/// let pipe = AudioPipe::builder()
///     .format(FormatPreset::Transcription)
///     .buffer_frames(32_768)
///     .on_event(|e| tracing::warn!(?e, "pipe event"))
///     .open_input()?;
///
/// let mut samples = [0i16; 1024];
/// let n = pipe.read(&mut samples);
/// # Ok::<(), audio_pipe::AudioPipeError>(())
/// ```
#[must_use]
pub struct PipeBuilder {
    config: PipeConfig,
    /// Device name; `None` selects the system default.
    device: Option<String>,
    event_callback: Option<EventCallback>,
}

impl Default for PipeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: PipeConfig::default(),
            device: None,
            event_callback: None,
        }
    }

    /// Set the application-side format.
    ///
    /// Default: [`FormatPreset::Native`]
    pub fn format(mut self, format: FormatPreset) -> Self {
        self.config.format = format;
        self
    }

    /// Set the queue capacity in samples.
    pub fn buffer_frames(mut self, frames: usize) -> Self {
        self.config.buffer_frames = frames;
        self
    }

    /// Set how many converted samples the resampler stages per flush.
    pub fn resampler_capacity(mut self, samples: usize) -> Self {
        self.config.resampler_capacity = samples;
        self
    }

    /// Set the input-direction behavior on a full queue.
    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow = policy;
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: PipeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific device by name instead of the system default.
    pub fn device(mut self, name: impl Into<String>) -> Self {
        self.device = Some(name.into());
        self
    }

    /// Set a callback to receive runtime events.
    ///
    /// Events include dropped input, output underruns and device errors.
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(PipeEvent) + Send + Sync + 'static,
    {
        self.event_callback = Some(event_callback(callback));
        self
    }

    /// Returns the configuration built so far.
    pub fn config(&self) -> &PipeConfig {
        &self.config
    }

    /// Builds an input pipe for a device streaming `device_format`.
    ///
    /// Push each device block into the returned [`InputFeeder`].
    pub fn build_input(
        self,
        device_format: StreamFormat,
    ) -> Result<(InputPipe, InputFeeder), AudioPipeError> {
        InputPipe::detached(&self.config, device_format, self.event_callback)
    }

    /// Builds an output pipe for a device consuming `device_format`.
    ///
    /// Fill each device block from the returned [`OutputRenderer`].
    pub fn build_output(
        self,
        device_format: StreamFormat,
    ) -> Result<(OutputPipe, OutputRenderer), AudioPipeError> {
        OutputPipe::detached(&self.config, device_format, self.event_callback)
    }

    /// Opens the input device and starts capturing into a new pipe.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The device cannot be found or opened
    /// - The device's sample format is unsupported
    pub fn open_input(self) -> Result<InputPipe, AudioPipeError> {
        let device = match &self.device {
            Some(name) => AudioDevice::input_by_name(name)?,
            None => AudioDevice::default_input()?,
        };
        let device_format = device.native_format()?;

        let (mut pipe, feeder) =
            InputPipe::detached(&self.config, device_format, self.event_callback.clone())?;
        let stream = device.start_input(feeder, self.event_callback)?;
        pipe.attach(stream);

        tracing::info!(device = %device.name(), "input pipe started");
        Ok(pipe)
    }

    /// Opens the output device and starts playing from a new pipe.
    ///
    /// Playback starts with silence until samples are written.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The device cannot be found or opened
    /// - The device's sample format is unsupported
    pub fn open_output(self) -> Result<OutputPipe, AudioPipeError> {
        let device = match &self.device {
            Some(name) => AudioDevice::output_by_name(name)?,
            None => AudioDevice::default_output()?,
        };
        let device_format = device.native_format()?;

        let (mut pipe, renderer) =
            OutputPipe::detached(&self.config, device_format, self.event_callback.clone())?;
        let stream = device.start_output(renderer, self.event_callback)?;
        pipe.attach(stream);

        tracing::info!(device = %device.name(), "output pipe started");
        Ok(pipe)
    }
}

/// Main entry point for audio-pipe.
///
/// Use [`AudioPipe::builder()`] to start configuring a pipe.
pub struct AudioPipe;

impl AudioPipe {
    /// Creates a new builder for configuring a pipe.
    pub fn builder() -> PipeBuilder {
        PipeBuilder::new()
    }
}
