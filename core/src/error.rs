/*!
# Error Module

This module defines the error handling infrastructure for Sluice.

Errors fall into three groups:
- Queue errors raised by the queue service while receiving or deleting
- Handler errors raised by user code while processing a message
- Caller errors such as an invalid configuration or waiting on an empty tracker

None of them is fatal to a running poller: fetch failures feed the backoff
timer, handler and delete failures are reported to the observer.
*/

use thiserror::Error;

/// Result type alias for Sluice operations
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Errors that can occur during Sluice operations
#[derive(Debug, Error)]
pub enum SluiceError {
    #[error("Queue error: {0}")]
    Queue(String),

    #[error("Handler failed for message {message_id}: {source:#}")]
    Handler {
        message_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Handler panicked for message {message_id}: {reason}")]
    HandlerPanic { message_id: String, reason: String },

    #[error("Failed to delete message {message_id}: {reason}")]
    Delete { message_id: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No tracked tasks to wait for")]
    NoTrackedTasks,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SluiceError {
    /// The id of the message this error belongs to, if any
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Handler { message_id, .. }
            | Self::HandlerPanic { message_id, .. }
            | Self::Delete { message_id, .. } => Some(message_id),
            _ => None,
        }
    }
}
