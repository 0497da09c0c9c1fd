//! Runtime events for monitoring pipe health.
//!
//! Events are non-fatal notifications about pipe behavior. The pipe
//! keeps running after events are emitted - they're for logging/metrics,
//! not error handling.

use std::sync::Arc;

/// Runtime events emitted by the hardware side of a pipe.
///
/// # Example
///
/// ```
/// use audio_pipe::PipeEvent;
///
/// fn handle_event(event: PipeEvent) {
///     match event {
///         PipeEvent::Overflow { dropped_bytes } => {
///             eprintln!("Warning: dropped {} bytes of input", dropped_bytes);
///         }
///         PipeEvent::Underrun { missing_samples } => {
///             eprintln!("Output starved: {} samples of silence", missing_samples);
///         }
///         PipeEvent::DeviceError { reason } => {
///             eprintln!("Device error: {}", reason);
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipeEvent {
    /// The input queue was full and incoming audio was discarded.
    ///
    /// Only emitted under [`OverflowPolicy::DropIncoming`]; with the default
    /// blocking policy the hardware thread waits instead.
    ///
    /// [`OverflowPolicy::DropIncoming`]: crate::OverflowPolicy::DropIncoming
    Overflow {
        /// Bytes discarded by this write.
        dropped_bytes: usize,
    },

    /// The output queue ran dry and the device was fed silence.
    ///
    /// Emitted once when the output side starts starving, not on every
    /// starved callback. Audio that has never flowed does not count.
    Underrun {
        /// Samples of silence written in the callback that detected it.
        missing_samples: usize,
    },

    /// The audio backend reported a stream error.
    DeviceError {
        /// Description from the backend.
        reason: String,
    },
}

/// Callback type for receiving runtime events.
///
/// Callbacks run on the hardware thread, so they must return quickly.
pub type EventCallback = Arc<dyn Fn(PipeEvent) + Send + Sync>;

/// Creates an [`EventCallback`] from a closure.
///
/// # Example
///
/// ```
/// use audio_pipe::{event_callback, PipeEvent};
///
/// let callback = event_callback(|event| {
///     println!("Got event: {:?}", event);
/// });
/// callback(PipeEvent::Overflow { dropped_bytes: 4 });
/// ```
pub fn event_callback<F>(f: F) -> EventCallback
where
    F: Fn(PipeEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn emit(callback: Option<&EventCallback>, event: PipeEvent) {
    if let Some(callback) = callback {
        callback(event);
    }
}
