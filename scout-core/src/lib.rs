pub mod types;
pub mod error;
pub mod config;

pub use error::{Error, Result};
pub use types::{
    normalize_label, BoundingBox, ConfidenceTier, Detection, DetectionFrame, FilteredDetection, HapticPattern,
    ScanMode, Verbosity,
};
pub use config::{ConfidenceConfig, NmsConfig, ScanConfig};
