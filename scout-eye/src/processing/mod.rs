//! Detection post-processing

pub mod detection;
pub mod filter;
pub mod geometry;
pub mod nms;
pub mod tracker;

pub use detection::DetectionPipeline;
pub use filter::ConfidenceFilter;
pub use geometry::iou;
pub use nms::NonMaxSuppressor;
pub use tracker::EntityTracker;
