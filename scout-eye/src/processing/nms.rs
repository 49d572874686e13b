//! Non-maximum suppression

use super::geometry::iou;
use scout_core::{Detection, NmsConfig};
use tracing::debug;

/// Keeps the most confident detection of each overlapping same-label cluster
#[derive(Debug, Clone, PartialEq)]
pub struct NonMaxSuppressor {
    iou_threshold: f32,
    max_candidates: usize,
}

impl Default for NonMaxSuppressor {
    fn default() -> Self {
        Self::from_config(&NmsConfig::default())
    }
}

impl NonMaxSuppressor {
    pub fn new(iou_threshold: f32, max_candidates: usize) -> Self {
        Self {
            iou_threshold,
            max_candidates: max_candidates.max(1),
        }
    }

    pub fn from_config(config: &NmsConfig) -> Self {
        Self::new(config.iou_threshold, config.max_candidates)
    }

    /// Apply Non-Maximum Suppression
    pub fn suppress(&self, mut detections: Vec<Detection>) -> Vec<Detection> {
        if detections.len() <= 1 {
            return detections;
        }

        // Stable sort: equal confidences keep their original order, so the
        // earliest-listed duplicate wins. NaN confidences sort last.
        detections.sort_by(|a, b| sort_key(b.confidence).total_cmp(&sort_key(a.confidence)));

        if detections.len() > self.max_candidates {
            debug!(
                "NMS input capped at {} of {} candidates",
                self.max_candidates,
                detections.len()
            );
            detections.truncate(self.max_candidates);
        }

        let mut suppressed = vec![false; detections.len()];

        for i in 0..detections.len() {
            if suppressed[i] {
                continue;
            }

            for j in (i + 1)..detections.len() {
                if suppressed[j] || !same_label(&detections[i], &detections[j]) {
                    continue;
                }

                if iou(&detections[i].bbox, &detections[j].bbox) > self.iou_threshold {
                    suppressed[j] = true;
                }
            }
        }

        detections
            .into_iter()
            .zip(suppressed)
            .filter(|(_, dropped)| !dropped)
            .map(|(d, _)| d)
            .collect()
    }
}

fn sort_key(confidence: f32) -> f32 {
    if confidence.is_nan() {
        f32::NEG_INFINITY
    } else {
        confidence
    }
}

fn same_label(a: &Detection, b: &Detection) -> bool {
    a.label_key() == b.label_key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::BoundingBox;

    fn det(label: &str, confidence: f32, bbox: (f32, f32, f32, f32)) -> Detection {
        Detection::new(label, confidence, BoundingBox::new(bbox.0, bbox.1, bbox.2, bbox.3))
    }

    #[test]
    fn test_nms_empty_and_single() {
        let nms = NonMaxSuppressor::default();
        assert!(nms.suppress(vec![]).is_empty());

        let single = vec![det("chair", 0.3, (0.1, 0.1, 0.5, 0.5))];
        assert_eq!(nms.suppress(single.clone()), single);
    }

    #[test]
    fn test_nms_suppresses_same_label_overlap() {
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("chair", 0.78, (0.12, 0.12, 0.52, 0.52)),
            det("chair", 0.92, (0.1, 0.1, 0.5, 0.5)),
        ]);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].confidence, 0.92);
    }

    #[test]
    fn test_nms_keeps_different_labels() {
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("chair", 0.9, (0.1, 0.1, 0.5, 0.5)),
            det("person", 0.8, (0.1, 0.1, 0.5, 0.5)),
        ]);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_nms_label_comparison_ignores_case() {
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("Chair", 0.9, (0.1, 0.1, 0.5, 0.5)),
            det("chair", 0.8, (0.1, 0.1, 0.5, 0.5)),
        ]);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].label, "Chair");
    }

    #[test]
    fn test_nms_label_comparison_ignores_whitespace() {
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("chair ", 0.9, (0.1, 0.1, 0.5, 0.5)),
            det(" Chair", 0.8, (0.1, 0.1, 0.5, 0.5)),
        ]);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].label, "chair ");
    }

    #[test]
    fn test_nms_keeps_distant_same_label() {
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("chair", 0.9, (0.0, 0.0, 0.2, 0.2)),
            det("chair", 0.8, (0.6, 0.6, 0.9, 0.9)),
        ]);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_nms_threshold_is_strict() {
        // IoU of exactly 0.5 is not above the 0.5 threshold
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("box", 0.9, (0.0, 0.0, 1.0, 1.0)),
            det("box", 0.8, (0.0, 0.0, 1.0, 0.5)),
        ]);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_nms_tie_break_earliest_wins() {
        let nms = NonMaxSuppressor::default();
        let first = det("door", 0.8, (0.1, 0.1, 0.5, 0.5));
        let second = det("door", 0.8, (0.11, 0.11, 0.51, 0.51));
        let output = nms.suppress(vec![first.clone(), second]);
        assert_eq!(output, vec![first]);
    }

    #[test]
    fn test_nms_output_sorted_by_confidence() {
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("a", 0.5, (0.0, 0.0, 0.1, 0.1)),
            det("b", 0.9, (0.2, 0.2, 0.3, 0.3)),
            det("c", 0.7, (0.4, 0.4, 0.5, 0.5)),
        ]);
        let confidences: Vec<f32> = output.iter().map(|d| d.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn test_nms_caps_candidates() {
        let nms = NonMaxSuppressor::new(0.5, 200);
        let detections: Vec<Detection> = (0..300)
            .map(|i| {
                let x = (i % 20) as f32 * 0.05;
                let y = (i / 20) as f32 * 0.05;
                det(&format!("obj{}", i), 0.3 + (i as f32) * 0.001, (x, y, x + 0.01, y + 0.01))
            })
            .collect();
        let output = nms.suppress(detections);
        assert_eq!(output.len(), 200);
        // The low-confidence tail is what gets dropped
        assert!(output.iter().all(|d| d.confidence >= 0.3 + 100.0 * 0.001 - 1e-6));
    }

    #[test]
    fn test_nms_nan_sorted_last() {
        let nms = NonMaxSuppressor::default();
        let output = nms.suppress(vec![
            det("x", f32::NAN, (0.1, 0.1, 0.5, 0.5)),
            det("x", 0.4, (0.1, 0.1, 0.5, 0.5)),
        ]);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].confidence, 0.4);
    }
}
