//! scout-eye: detection post-processing for the scanning engine
//!
//! Reduces raw detector output to a clean, de-duplicated set:
//! confidence filtering and tiering, same-label non-maximum suppression,
//! and the session-scoped tracker of already-announced entities.

pub mod detector;
pub mod error;
pub mod processing;

pub use detector::Detector;
pub use error::VisionError;
pub use processing::{
    iou, ConfidenceFilter, DetectionPipeline, EntityTracker, NonMaxSuppressor,
};
