//! Scan session configuration

use crate::error::{Error, Result};
use crate::types::ScanMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Confidence thresholds and tier boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Minimum confidence for single-shot detection
    pub interactive_threshold: f32,
    /// Minimum confidence while scanning continuously
    pub continuous_threshold: f32,
    pub high_tier: f32,
    pub medium_tier: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            interactive_threshold: 0.6,
            continuous_threshold: 0.45,
            high_tier: 0.85,
            medium_tier: 0.70,
        }
    }
}

impl ConfidenceConfig {
    pub fn threshold_for(&self, mode: ScanMode) -> f32 {
        match mode {
            ScanMode::Interactive => self.interactive_threshold,
            ScanMode::Continuous => self.continuous_threshold,
        }
    }
}

/// Non-maximum suppression parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NmsConfig {
    pub iou_threshold: f32,
    /// Candidates beyond this count (lowest confidence first) are dropped
    pub max_candidates: usize,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.5,
            max_candidates: 200,
        }
    }
}

/// Scan controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub tick_interval_ms: u64,
    pub detect_timeout_ms: u64,
    pub max_session_secs: u64,
    pub max_consecutive_errors: u32,
    pub queue_capacity: usize,
    pub announcement_gap_ms: u64,
    pub mode: ScanMode,
    pub confidence: ConfidenceConfig,
    pub nms: NmsConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 3000,
            detect_timeout_ms: 2500,
            max_session_secs: 60,
            max_consecutive_errors: 3,
            queue_capacity: 5,
            announcement_gap_ms: 500,
            mode: ScanMode::Continuous,
            confidence: ConfidenceConfig::default(),
            nms: NmsConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: ScanConfig = toml::from_str(input)?;
        config.validate().map_err(Error::Configuration)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn detect_timeout(&self) -> Duration {
        Duration::from_millis(self.detect_timeout_ms)
    }

    pub fn max_session(&self) -> Duration {
        Duration::from_secs(self.max_session_secs)
    }

    pub fn announcement_gap(&self) -> Duration {
        Duration::from_millis(self.announcement_gap_ms)
    }

    /// Threshold for the configured mode
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence.threshold_for(self.mode)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.tick_interval_ms == 0 {
            return Err("Tick interval must be non-zero".to_string());
        }

        if self.detect_timeout_ms == 0 {
            return Err("Detect timeout must be non-zero".to_string());
        }

        // A detect call must never overlap the next tick
        if self.detect_timeout_ms >= self.tick_interval_ms {
            return Err(format!(
                "Detect timeout ({} ms) must be shorter than the tick interval ({} ms)",
                self.detect_timeout_ms, self.tick_interval_ms
            ));
        }

        if self.max_session_secs == 0 {
            return Err("Maximum session length must be non-zero".to_string());
        }

        if self.max_consecutive_errors == 0 {
            return Err("Maximum consecutive errors must be at least 1".to_string());
        }

        if self.queue_capacity == 0 || self.queue_capacity > 64 {
            return Err("Queue capacity must be between 1 and 64".to_string());
        }

        let c = &self.confidence;
        for (name, value) in [
            ("interactive_threshold", c.interactive_threshold),
            ("continuous_threshold", c.continuous_threshold),
            ("high_tier", c.high_tier),
            ("medium_tier", c.medium_tier),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("Confidence {} must be between 0.0 and 1.0", name));
            }
        }

        if c.high_tier < c.medium_tier {
            return Err("High tier boundary must not be below the medium tier boundary".to_string());
        }

        if !(0.0..=1.0).contains(&self.nms.iou_threshold) {
            return Err("NMS IoU threshold must be between 0.0 and 1.0".to_string());
        }

        if self.nms.max_candidates == 0 {
            return Err("NMS candidate cap must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ScanConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(3000));
        assert_eq!(config.detect_timeout(), Duration::from_millis(2500));
        assert_eq!(config.max_session(), Duration::from_secs(60));
        assert_eq!(config.max_consecutive_errors, 3);
        assert_eq!(config.queue_capacity, 5);
        assert_eq!(config.announcement_gap(), Duration::from_millis(500));
        assert_eq!(config.mode, ScanMode::Continuous);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_per_mode() {
        let mut config = ScanConfig::default();
        assert_eq!(config.confidence_threshold(), 0.45);
        config.mode = ScanMode::Interactive;
        assert_eq!(config.confidence_threshold(), 0.6);
    }

    #[test]
    fn test_validation_timeout_exceeds_tick() {
        let mut config = ScanConfig::default();
        config.detect_timeout_ms = 3000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut config = ScanConfig::default();
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.max_consecutive_errors = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.queue_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.nms.max_candidates = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_confidence_ranges() {
        let mut config = ScanConfig::default();
        config.confidence.continuous_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.confidence.high_tier = 0.6;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.nms.iou_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ScanConfig::from_toml_str(
            r#"
            queue_capacity = 8
            mode = "interactive"

            [confidence]
            interactive_threshold = 0.7
            "#,
        )
        .unwrap();
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.mode, ScanMode::Interactive);
        assert_eq!(config.confidence_threshold(), 0.7);
        assert_eq!(config.confidence.continuous_threshold, 0.45);
        assert_eq!(config.tick_interval_ms, 3000);
    }

    #[test]
    fn test_from_toml_invalid_values() {
        let result = ScanConfig::from_toml_str("detect_timeout_ms = 9000");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_from_toml_malformed() {
        let result = ScanConfig::from_toml_str("queue_capacity = [");
        assert!(matches!(result, Err(Error::Deserialization(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_session_secs = 30").unwrap();
        let config = ScanConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_session(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_missing_file() {
        let result = ScanConfig::from_file("/nonexistent/scout.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
