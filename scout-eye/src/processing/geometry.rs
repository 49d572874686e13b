//! Box geometry helpers

use scout_core::BoundingBox;
use tracing::warn;

/// Compute IoU (Intersection over Union) between two normalized boxes.
///
/// Returns 0.0 when the boxes do not overlap or when either box is
/// malformed (non-finite coordinates, inverted or zero extent).
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let area_a = a.area();
    let area_b = b.area();

    if area_a <= 0.0 || area_b <= 0.0 {
        if !a.is_well_formed() {
            warn!(bbox = ?a, "Malformed bounding box from detector, treating as non-overlapping");
        }
        if !b.is_well_formed() {
            warn!(bbox = ?b, "Malformed bounding box from detector, treating as non-overlapping");
        }
        return 0.0;
    }

    let inter_x_min = a.x_min.max(b.x_min);
    let inter_y_min = a.y_min.max(b.y_min);
    let inter_x_max = a.x_max.min(b.x_max);
    let inter_y_max = a.y_max.min(b.y_max);

    if inter_x_max <= inter_x_min || inter_y_max <= inter_y_min {
        return 0.0;
    }

    let inter_area = (inter_x_max - inter_x_min) * (inter_y_max - inter_y_min);
    let union_area = area_a + area_b - inter_area;

    if union_area <= 0.0 || !union_area.is_finite() {
        return 0.0;
    }

    let iou = inter_area / union_area;
    if iou.is_finite() {
        iou.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
