//! Configuration types for audio pipes.

use crate::AudioPipeError;

/// Size in bytes of one queued sample (native-endian f32).
pub const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// Sample rate and channel count of one side of a pipe.
///
/// Samples cross the pipe interleaved, so the rate that matters for
/// conversion is [`interleaved_rate`](Self::interleaved_rate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFormat {
    /// Frames per second in Hz.
    pub sample_rate: f64,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl StreamFormat {
    /// Creates a new stream format.
    #[must_use]
    pub fn new(sample_rate: f64, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Samples per second across all channels.
    #[must_use]
    pub fn interleaved_rate(&self) -> f64 {
        self.sample_rate * f64::from(self.channels)
    }

    /// Checks that the rate is positive and finite and channels are non-zero.
    pub fn validate(&self) -> Result<(), AudioPipeError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(AudioPipeError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }
        if self.channels == 0 {
            return Err(AudioPipeError::InvalidChannelCount {
                channels: self.channels,
            });
        }
        Ok(())
    }
}

impl Default for StreamFormat {
    /// 44.1kHz stereo, the format the hardware side assumes when none is queried.
    fn default() -> Self {
        Self::new(44_100.0, 2)
    }
}

/// Preset application-side formats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FormatPreset {
    /// Use the device's native format without conversion.
    #[default]
    Native,

    /// 44.1kHz stereo.
    Cd,

    /// 16kHz mono, the usual input format for speech-to-text engines.
    Transcription,

    /// Any other rate and channel count.
    Custom {
        /// Frames per second in Hz.
        sample_rate: f64,
        /// Number of interleaved channels.
        channels: u16,
    },
}

impl FormatPreset {
    /// Resolves the application-side format against the device format.
    #[must_use]
    pub fn resolve(&self, device: StreamFormat) -> StreamFormat {
        match *self {
            Self::Native => device,
            Self::Cd => StreamFormat::new(44_100.0, 2),
            Self::Transcription => StreamFormat::new(16_000.0, 1),
            Self::Custom {
                sample_rate,
                channels,
            } => StreamFormat::new(sample_rate, channels),
        }
    }
}

/// What the input-direction hardware callback does when the queue is full.
///
/// Blocking preserves every sample but can stall the real-time thread past
/// its deadline if the application stops reading. Dropping keeps the
/// hardware thread on time at the cost of losing the newest audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Block the hardware thread until the reader frees space.
    #[default]
    Block,
    /// Write what fits and discard the rest, emitting
    /// [`PipeEvent::Overflow`](crate::PipeEvent::Overflow).
    DropIncoming,
}

/// Configuration for one audio pipe.
///
/// Use [`PipeConfig::default()`] for sensible defaults, or customize as needed.
///
/// # Example
///
/// ```
/// use audio_pipe::{FormatPreset, PipeConfig};
///
/// let config = PipeConfig {
///     format: FormatPreset::Transcription,
///     buffer_frames: 8192,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipeConfig {
    /// Application-side sample format.
    ///
    /// Default: [`FormatPreset::Native`]
    pub format: FormatPreset,

    /// Queue capacity in samples. The byte capacity is this times 4.
    ///
    /// Larger queues reduce dropout probability at the cost of latency.
    /// Default: 16384
    pub buffer_frames: usize,

    /// Number of converted samples staged in the resampler before they are
    /// pushed into the queue.
    ///
    /// Default: 1024
    pub resampler_capacity: usize,

    /// Behavior of the input-direction hardware write on a full queue.
    ///
    /// Default: [`OverflowPolicy::Block`]
    pub overflow: OverflowPolicy,
}

impl PipeConfig {
    /// Byte capacity of the pipe's queue.
    #[must_use]
    pub fn queue_bytes(&self) -> usize {
        self.buffer_frames.saturating_mul(SAMPLE_BYTES)
    }

    /// Rejects zero capacities and invalid custom formats.
    pub fn validate(&self) -> Result<(), AudioPipeError> {
        if self.buffer_frames == 0 {
            return Err(AudioPipeError::InvalidCapacity {
                capacity: self.buffer_frames,
            });
        }
        if self.resampler_capacity == 0 {
            return Err(AudioPipeError::InvalidCapacity {
                capacity: self.resampler_capacity,
            });
        }
        if let FormatPreset::Custom {
            sample_rate,
            channels,
        } = self.format
        {
            StreamFormat::new(sample_rate, channels).validate()?;
        }
        Ok(())
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            format: FormatPreset::Native,
            buffer_frames: 16_384,
            resampler_capacity: 1024,
            overflow: OverflowPolicy::Block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_config_defaults() {
        let config = PipeConfig::default();
        assert_eq!(config.format, FormatPreset::Native);
        assert_eq!(config.buffer_frames, 16_384);
        assert_eq!(config.resampler_capacity, 1024);
        assert_eq!(config.overflow, OverflowPolicy::Block);
        assert_eq!(config.queue_bytes(), 16_384 * 4);
    }

    #[test]
    fn test_format_preset_resolve() {
        let device = StreamFormat::new(48_000.0, 2);
        assert_eq!(FormatPreset::Native.resolve(device), device);
        assert_eq!(
            FormatPreset::Transcription.resolve(device),
            StreamFormat::new(16_000.0, 1)
        );
        assert_eq!(
            FormatPreset::Cd.resolve(device),
            StreamFormat::new(44_100.0, 2)
        );
    }

    #[test]
    fn test_interleaved_rate() {
        assert_eq!(StreamFormat::new(22_050.0, 1).interleaved_rate(), 22_050.0);
        assert_eq!(StreamFormat::default().interleaved_rate(), 88_200.0);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = PipeConfig {
            buffer_frames: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AudioPipeError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_custom_format() {
        let config = PipeConfig {
            format: FormatPreset::Custom {
                sample_rate: 0.0,
                channels: 1,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AudioPipeError::InvalidSampleRate { .. })
        ));

        let config = PipeConfig {
            format: FormatPreset::Custom {
                sample_rate: 8000.0,
                channels: 0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AudioPipeError::InvalidChannelCount { channels: 0 })
        ));
    }

    #[test]
    fn test_stream_format_rejects_nan() {
        assert!(StreamFormat::new(f64::NAN, 2).validate().is_err());
        assert!(StreamFormat::new(-44_100.0, 2).validate().is_err());
    }
}
