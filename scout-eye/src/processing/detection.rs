//! Detection post-processing pipeline

use super::filter::ConfidenceFilter;
use super::nms::NonMaxSuppressor;
use crate::error::VisionError;
use scout_core::{Detection, FilteredDetection, ScanConfig, ScanMode};
use tracing::debug;

/// Confidence filter followed by non-maximum suppression
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    filter: ConfidenceFilter,
    nms: NonMaxSuppressor,
}

impl DetectionPipeline {
    /// Create a new detection pipeline
    pub fn new(filter: ConfidenceFilter, nms: NonMaxSuppressor) -> Self {
        Self { filter, nms }
    }

    pub fn from_config(config: &ScanConfig, mode: ScanMode) -> Result<Self, VisionError> {
        Ok(Self::new(
            ConfidenceFilter::for_mode(config, mode)?,
            NonMaxSuppressor::from_config(&config.nms),
        ))
    }

    pub fn filter(&self) -> &ConfidenceFilter {
        &self.filter
    }

    /// Reduce raw detections to a tiered, de-duplicated set, most confident first
    pub fn process(&self, detections: &[Detection]) -> Vec<FilteredDetection> {
        let confident = self.filter.filter(detections);
        let survivors = self.nms.suppress(confident);
        let processed = self.filter.apply(&survivors);
        debug!(
            "Pipeline reduced {} raw detections to {}",
            detections.len(),
            processed.len()
        );
        processed
    }
}
