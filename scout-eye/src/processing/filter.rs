//! Confidence filtering and tiering

use crate::error::VisionError;
use scout_core::{ConfidenceTier, Detection, FilteredDetection, ScanConfig, ScanMode};
use tracing::debug;

/// Drops low-confidence detections and buckets the survivors
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceFilter {
    threshold: f32,
    high_tier: f32,
    medium_tier: f32,
}

impl ConfidenceFilter {
    /// Filter with the default tier boundaries (0.85 / 0.70)
    pub fn new(threshold: f32) -> Result<Self, VisionError> {
        Self::with_tiers(threshold, 0.85, 0.70)
    }

    pub fn with_tiers(threshold: f32, high_tier: f32, medium_tier: f32) -> Result<Self, VisionError> {
        for value in [threshold, high_tier, medium_tier] {
            if !(0.0..=1.0).contains(&value) {
                return Err(VisionError::InvalidInput(format!(
                    "Confidence boundary {} outside [0, 1]",
                    value
                )));
            }
        }
        if high_tier < medium_tier {
            return Err(VisionError::InvalidInput(
                "High tier boundary below medium tier boundary".to_string(),
            ));
        }
        Ok(Self {
            threshold,
            high_tier,
            medium_tier,
        })
    }

    /// Build the filter for a scan mode from configuration
    pub fn for_mode(config: &ScanConfig, mode: ScanMode) -> Result<Self, VisionError> {
        Self::with_tiers(
            config.confidence.threshold_for(mode),
            config.confidence.high_tier,
            config.confidence.medium_tier,
        )
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Keep detections at or above the threshold, preserving order
    pub fn filter(&self, detections: &[Detection]) -> Vec<Detection> {
        let kept: Vec<Detection> = detections
            .iter()
            .filter(|d| self.passes(d.confidence))
            .cloned()
            .collect();
        debug!(
            "Confidence filter kept {} of {} detections (threshold {})",
            kept.len(),
            detections.len(),
            self.threshold
        );
        kept
    }

    /// Bucket a confidence that already passed the filter
    pub fn categorize(&self, confidence: f32) -> Result<ConfidenceTier, VisionError> {
        if !self.passes(confidence) {
            return Err(VisionError::InvalidInput(format!(
                "Confidence {} is below threshold {}",
                confidence, self.threshold
            )));
        }

        Ok(if confidence >= self.high_tier {
            ConfidenceTier::High
        } else if confidence >= self.medium_tier {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        })
    }

    /// Filter, then attach a tier to every survivor
    pub fn apply(&self, detections: &[Detection]) -> Vec<FilteredDetection> {
        self.filter(detections)
            .into_iter()
            .filter_map(|detection| {
                self.categorize(detection.confidence)
                    .ok()
                    .map(|tier| FilteredDetection { detection, tier })
            })
            .collect()
    }

    fn passes(&self, confidence: f32) -> bool {
        confidence.is_finite() && confidence >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::BoundingBox;

    fn det(label: &str, confidence: f32) -> Detection {
        Detection::new(label, confidence, BoundingBox::new(0.1, 0.1, 0.5, 0.5))
    }

    #[test]
    fn test_filter_drops_below_threshold() {
        let filter = ConfidenceFilter::new(0.6).unwrap();
        let input = vec![det("chair", 0.92), det("table", 0.45), det("person", 0.6)];
        let output = filter.filter(&input);
        let labels: Vec<_> = output.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["chair", "person"]);
    }

    #[test]
    fn test_filter_empty() {
        let filter = ConfidenceFilter::new(0.45).unwrap();
        assert!(filter.filter(&[]).is_empty());
    }

    #[test]
    fn test_filter_drops_nan() {
        let filter = ConfidenceFilter::new(0.0).unwrap();
        let output = filter.filter(&[det("ghost", f32::NAN), det("door", 0.1)]);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].label, "door");
    }

    #[test]
    fn test_filter_idempotent() {
        let filter = ConfidenceFilter::new(0.5).unwrap();
        let input = vec![det("a", 0.9), det("b", 0.3), det("c", 0.5)];
        let once = filter.filter(&input);
        let twice = filter.filter(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_categorize_tiers() {
        let filter = ConfidenceFilter::new(0.45).unwrap();
        assert_eq!(filter.categorize(0.85).unwrap(), ConfidenceTier::High);
        assert_eq!(filter.categorize(0.99).unwrap(), ConfidenceTier::High);
        assert_eq!(filter.categorize(0.70).unwrap(), ConfidenceTier::Medium);
        assert_eq!(filter.categorize(0.84).unwrap(), ConfidenceTier::Medium);
        assert_eq!(filter.categorize(0.45).unwrap(), ConfidenceTier::Low);
    }

    #[test]
    fn test_categorize_below_threshold_fails() {
        let filter = ConfidenceFilter::new(0.6).unwrap();
        assert!(matches!(
            filter.categorize(0.59),
            Err(VisionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(ConfidenceFilter::new(1.5).is_err());
        assert!(ConfidenceFilter::new(-0.1).is_err());
        assert!(ConfidenceFilter::with_tiers(0.5, 0.6, 0.8).is_err());
    }

    #[test]
    fn test_for_mode_reads_config() {
        let config = ScanConfig::default();
        let interactive = ConfidenceFilter::for_mode(&config, ScanMode::Interactive).unwrap();
        let continuous = ConfidenceFilter::for_mode(&config, ScanMode::Continuous).unwrap();
        assert_eq!(interactive.threshold(), 0.6);
        assert_eq!(continuous.threshold(), 0.45);
    }

    #[test]
    fn test_apply_attaches_tiers() {
        let filter = ConfidenceFilter::new(0.6).unwrap();
        let output = filter.apply(&[det("chair", 0.92), det("lamp", 0.3), det("person", 0.72)]);
        assert_eq!(output.len(), 2);
        assert_eq!(output[0].tier, ConfidenceTier::High);
        assert_eq!(output[1].tier, ConfidenceTier::Medium);
    }
}
