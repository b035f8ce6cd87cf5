use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::core::system_monitor::FieldSet;

/// Custom error type for grofer
#[derive(Error, Debug)]
pub enum GroferError {
    /// The OS metric provider could not produce a value for a metric class.
    #[error("{field_set} provider error: {message}")]
    Provider { field_set: FieldSet, message: String },

    /// A probe observed the round's cancellation before it finished.
    #[error("{0} probe cancelled")]
    Cancelled(FieldSet),

    #[error("Round deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Probe task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for grofer
pub type Result<T> = std::result::Result<T, GroferError>;

impl GroferError {
    /// Create a provider error for a metric class
    pub fn provider<S: Into<String>>(field_set: FieldSet, msg: S) -> Self {
        GroferError::Provider {
            field_set,
            message: msg.into(),
        }
    }

    pub fn sink<S: Into<String>>(msg: S) -> Self {
        GroferError::Sink(msg.into())
    }

    pub fn task<S: Into<String>>(msg: S) -> Self {
        GroferError::Task(msg.into())
    }

    /// True when the error means "aborted", not "failed".
    ///
    /// Probes that stop because a sibling failed (or because the caller or a
    /// deadline cancelled the round) report a cancellation; everything else is
    /// a root cause.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            GroferError::Cancelled(_) | GroferError::DeadlineExceeded(_)
        )
    }
}
