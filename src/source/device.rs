//! CPAL device wrapper: the hardware side of a pipe.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig as CpalStreamConfig};

use crate::event::emit;
use crate::format::{from_f32_slice, to_f32_slice};
use crate::{
    AudioPipeError, EventCallback, InputFeeder, OutputRenderer, PipeEvent, StreamFormat,
};

/// Which way audio flows through a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Capture (microphone, line in).
    Input,
    /// Playback (speakers, line out).
    Output,
}

/// Wrapper around a CPAL input or output device.
#[must_use]
pub struct AudioDevice {
    device: Device,
    direction: Direction,
}

impl AudioDevice {
    /// Opens the default input device.
    ///
    /// # Errors
    ///
    /// Returns `NoDefaultInputDevice` if none is configured.
    pub fn default_input() -> Result<Self, AudioPipeError> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or(AudioPipeError::NoDefaultInputDevice)?;
        Ok(Self {
            device,
            direction: Direction::Input,
        })
    }

    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `NoDefaultOutputDevice` if none is configured.
    pub fn default_output() -> Result<Self, AudioPipeError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or(AudioPipeError::NoDefaultOutputDevice)?;
        Ok(Self {
            device,
            direction: Direction::Output,
        })
    }

    /// Opens an input device by name.
    ///
    /// # Errors
    ///
    /// Returns `DeviceNotFound` if no input device has that name.
    pub fn input_by_name(name: &str) -> Result<Self, AudioPipeError> {
        let devices = cpal::default_host()
            .input_devices()
            .map_err(|e| AudioPipeError::BackendError(e.to_string()))?;
        Self::find(devices, name, Direction::Input)
    }

    /// Opens an output device by name.
    ///
    /// # Errors
    ///
    /// Returns `DeviceNotFound` if no output device has that name.
    pub fn output_by_name(name: &str) -> Result<Self, AudioPipeError> {
        let devices = cpal::default_host()
            .output_devices()
            .map_err(|e| AudioPipeError::BackendError(e.to_string()))?;
        Self::find(devices, name, Direction::Output)
    }

    fn find(
        devices: impl Iterator<Item = Device>,
        name: &str,
        direction: Direction,
    ) -> Result<Self, AudioPipeError> {
        for device in devices {
            if device.name().is_ok_and(|n| n == name) {
                return Ok(Self { device, direction });
            }
        }

        Err(AudioPipeError::DeviceNotFound {
            name: name.to_string(),
        })
    }

    /// Returns the device name.
    pub fn name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "unknown".to_string())
    }

    /// Returns the direction this device was opened for.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the format the device streams at by default.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the device cannot report a configuration.
    pub fn native_format(&self) -> Result<StreamFormat, AudioPipeError> {
        let (config, _) = self.default_config()?;
        Ok(StreamFormat::new(
            f64::from(config.sample_rate.0),
            config.channels,
        ))
    }

    fn default_config(&self) -> Result<(CpalStreamConfig, SampleFormat), AudioPipeError> {
        let supported = match self.direction {
            Direction::Input => self.device.default_input_config(),
            Direction::Output => self.device.default_output_config(),
        }
        .map_err(|e| AudioPipeError::BackendError(e.to_string()))?;

        let sample_format = supported.sample_format();
        Ok((supported.into(), sample_format))
    }

    fn expect_direction(&self, direction: Direction) -> Result<(), AudioPipeError> {
        if self.direction == direction {
            Ok(())
        } else {
            Err(AudioPipeError::BackendError(format!(
                "{} was opened as {:?}, not {direction:?}",
                self.name(),
                self.direction
            )))
        }
    }

    /// Starts capturing into `feeder`.
    ///
    /// Every device callback pushes its block through the feeder before
    /// returning. Keep the returned stream alive for capture to continue.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not an input device, the device's sample
    /// format is neither f32 nor i16, or the stream cannot be started.
    pub fn start_input(
        &self,
        mut feeder: InputFeeder,
        on_event: Option<EventCallback>,
    ) -> Result<HardwareStream, AudioPipeError> {
        self.expect_direction(Direction::Input)?;
        let (config, sample_format) = self.default_config()?;

        let errors = error_callback(on_event);
        let stream = match sample_format {
            SampleFormat::F32 => self.device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| feeder.push(data),
                errors,
                None,
            ),
            SampleFormat::I16 => {
                let mut scratch = Vec::<f32>::with_capacity(4096);
                self.device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if scratch.len() < data.len() {
                            scratch.resize(data.len(), 0.0);
                        }
                        let n = to_f32_slice(data, &mut scratch);
                        feeder.push(&scratch[..n]);
                    },
                    errors,
                    None,
                )
            }
            format => {
                return Err(AudioPipeError::UnsupportedFormat {
                    format: format!("{format:?}"),
                });
            }
        }
        .map_err(|e| AudioPipeError::BackendError(e.to_string()))?;

        Self::play(stream, &self.name(), &config)
    }

    /// Starts playback from `renderer`.
    ///
    /// Every device callback is filled from the pipe's queue, with silence
    /// for anything missing. Keep the returned stream alive for playback to
    /// continue.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not an output device, the device's sample
    /// format is neither f32 nor i16, or the stream cannot be started.
    pub fn start_output(
        &self,
        mut renderer: OutputRenderer,
        on_event: Option<EventCallback>,
    ) -> Result<HardwareStream, AudioPipeError> {
        self.expect_direction(Direction::Output)?;
        let (config, sample_format) = self.default_config()?;

        let errors = error_callback(on_event);
        let stream = match sample_format {
            SampleFormat::F32 => self.device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    renderer.render(data);
                },
                errors,
                None,
            ),
            SampleFormat::I16 => {
                let mut scratch = Vec::<f32>::with_capacity(4096);
                self.device.build_output_stream(
                    &config,
                    move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                        if scratch.len() < data.len() {
                            scratch.resize(data.len(), 0.0);
                        }
                        let block = &mut scratch[..data.len()];
                        renderer.render(block);
                        from_f32_slice(block, data);
                    },
                    errors,
                    None,
                )
            }
            format => {
                return Err(AudioPipeError::UnsupportedFormat {
                    format: format!("{format:?}"),
                });
            }
        }
        .map_err(|e| AudioPipeError::BackendError(e.to_string()))?;

        Self::play(stream, &self.name(), &config)
    }

    fn play(
        stream: Stream,
        name: &str,
        config: &CpalStreamConfig,
    ) -> Result<HardwareStream, AudioPipeError> {
        stream
            .play()
            .map_err(|e| AudioPipeError::BackendError(e.to_string()))?;

        tracing::debug!(
            device = name,
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "hardware stream started"
        );
        Ok(HardwareStream { _stream: stream })
    }
}

fn error_callback(on_event: Option<EventCallback>) -> impl FnMut(cpal::StreamError) + Send {
    move |err| {
        tracing::error!("Audio stream error: {}", err);
        emit(
            on_event.as_ref(),
            PipeEvent::DeviceError {
                reason: err.to_string(),
            },
        );
    }
}

/// A running hardware stream.
///
/// The device runs while this exists. Dropping it stops the stream and
/// releases the device.
pub struct HardwareStream {
    _stream: Stream,
}
