//! Dispatch error types.

use common::EventId;
use thiserror::Error;

/// Error type subscribers return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while delivering events.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A subscriber failed. Delivery of the remaining subscribers and events
    /// of the same dispatch call was abandoned.
    #[error("Subscriber '{subscriber}' failed handling {kind} event {event_id}: {source}")]
    Subscriber {
        subscriber: &'static str,
        kind: String,
        event_id: EventId,
        #[source]
        source: BoxError,
    },

    /// A dispatch was started while another one was still in progress.
    #[error("Dispatch already in progress; nested or concurrent dispatch is not allowed")]
    Reentrant,
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
