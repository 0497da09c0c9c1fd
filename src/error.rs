//! Error types for audio-pipe.
//!
//! Errors are split into two categories:
//! - **Fatal errors** ([`AudioPipeError`]): Prevent a pipe from being constructed
//! - **Runtime events**: Overflow, underrun and device trouble, surfaced via
//!   [`EventCallback`](crate::EventCallback)
//!
//! Once a pipe exists, neither the queue nor the resampler has an error path:
//! blocking is the backpressure mechanism and underruns degrade to silence.

/// Fatal errors that prevent an audio pipe from being built.
///
/// These are returned from constructors and from [`PipeBuilder`] terminal
/// methods. A pipe is never left partially initialized.
///
/// [`PipeBuilder`]: crate::PipeBuilder
#[derive(Debug, thiserror::Error)]
pub enum AudioPipeError {
    /// A queue or staging buffer was configured with zero capacity.
    #[error("invalid capacity {capacity}: must be non-zero")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// A sample rate was zero, negative or not finite.
    #[error("invalid sample rate {rate}Hz: must be positive and finite")]
    InvalidSampleRate {
        /// The rejected rate.
        rate: f64,
    },

    /// A stream format declared zero channels.
    #[error("invalid channel count {channels}: must be at least 1")]
    InvalidChannelCount {
        /// The rejected channel count.
        channels: u16,
    },

    /// Backing storage for a queue could not be allocated.
    #[error("failed to allocate {bytes} bytes of queue storage")]
    AllocationFailed {
        /// Number of bytes requested.
        bytes: usize,
    },

    /// The requested audio device was not found.
    #[error("device not found: {name}")]
    DeviceNotFound {
        /// Name of the device that wasn't found.
        name: String,
    },

    /// No default input device is configured on this system.
    #[error("no default input device configured")]
    NoDefaultInputDevice,

    /// No default output device is configured on this system.
    #[error("no default output device configured")]
    NoDefaultOutputDevice,

    /// The device's native sample format cannot be bridged to f32.
    #[error("unsupported sample format: {format}")]
    UnsupportedFormat {
        /// The format that wasn't supported.
        format: String,
    },

    /// An error from the underlying audio library (CPAL).
    #[error("audio backend error: {0}")]
    BackendError(String),

    /// A blocking task offloaded to the tokio runtime failed.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_capacity_display() {
        let err = AudioPipeError::InvalidCapacity { capacity: 0 };
        assert_eq!(err.to_string(), "invalid capacity 0: must be non-zero");
    }

    #[test]
    fn test_invalid_rate_display() {
        let err = AudioPipeError::InvalidSampleRate { rate: -1.0 };
        assert!(err.to_string().contains("-1Hz"));
    }

    #[test]
    fn test_device_not_found_display() {
        let err = AudioPipeError::DeviceNotFound {
            name: "USB Mic".to_string(),
        };
        assert_eq!(err.to_string(), "device not found: USB Mic");
    }

    #[test]
    fn test_backend_error_display() {
        let err = AudioPipeError::BackendError("stream closed".to_string());
        assert_eq!(err.to_string(), "audio backend error: stream closed");
    }
}
