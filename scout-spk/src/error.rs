//! Error types for scout-spk

use scout_core::Error as CoreError;
use thiserror::Error;

/// Speech and announcement errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Speech sink error: {0}")]
    Sink(String),

    #[error("Announcement queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Announcement queue closed")]
    QueueClosed,

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Core(inner) => inner,
            other => CoreError::Speech(other.to_string()),
        }
    }
}
