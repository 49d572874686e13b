//! Error types for scout-eye

use scout_core::Error as CoreError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Detection timed out after {0:?}")]
    Timeout(Duration),

    #[error("Detector error: {0}")]
    Detector(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl VisionError {
    /// Whether the scan loop may try again on the next tick.
    /// Permission failures need user action, so they are final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, VisionError::PermissionDenied(_))
    }
}

impl From<VisionError> for CoreError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::InvalidInput(msg) => CoreError::InvalidInput(msg),
            VisionError::Core(inner) => inner,
            other => CoreError::Detection(other.to_string()),
        }
    }
}
