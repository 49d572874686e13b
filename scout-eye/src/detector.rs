//! Seam to the external object-detection model

use crate::error::VisionError;
use async_trait::async_trait;
use scout_core::DetectionFrame;

/// Captures a frame and runs the detection model on it.
///
/// Implementations should report revoked camera access as
/// [`VisionError::PermissionDenied`]; every other failure is retried by the
/// scan loop. Callers bound each call with their own timeout.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self) -> Result<DetectionFrame, VisionError>;

    /// Get detector name
    fn name(&self) -> &str {
        "detector"
    }
}
