//! Data model shared by the scanning crates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned box in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Area of the box, or 0.0 when the box is inverted or not finite
    pub fn area(&self) -> f32 {
        if !self.is_finite() {
            return 0.0;
        }
        let (w, h) = (self.width(), self.height());
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
    }

    /// True when all corners are finite and min < max on both axes
    pub fn is_well_formed(&self) -> bool {
        self.is_finite() && self.x_min < self.x_max && self.y_min < self.y_max
    }
}

/// Single object reported by the detector for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }

    /// Key under which two detections count as the same kind of object
    pub fn label_key(&self) -> String {
        normalize_label(&self.label)
    }
}

/// Labels compare case-insensitively, ignoring surrounding whitespace
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Output of one detector invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionFrame {
    pub detections: Vec<Detection>,
    pub latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl DetectionFrame {
    pub fn new(detections: Vec<Detection>, latency_ms: u64) -> Self {
        Self {
            detections,
            latency_ms,
            timestamp: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// Coarse confidence bucket used when phrasing announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "high"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::Low => write!(f, "low"),
        }
    }
}

/// Detection that survived confidence filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredDetection {
    pub detection: Detection,
    pub tier: ConfidenceTier,
}

impl FilteredDetection {
    pub fn label(&self) -> &str {
        &self.detection.label
    }

    pub fn confidence(&self) -> f32 {
        self.detection.confidence
    }
}

/// How much detail the user wants in announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    #[default]
    Brief,
    Detailed,
}

/// Which confidence threshold applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Single-shot, user-initiated detection
    Interactive,
    /// Autonomous periodic scanning
    #[default]
    Continuous,
}

/// Vibration cue requested from the haptic collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HapticPattern {
    NewEntity,
    Warning,
}
