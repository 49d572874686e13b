//! Spoken phrase construction

use crate::state::StopReason;
use scout_core::{ConfidenceTier, Verbosity};

pub fn start_message() -> &'static str {
    "Scanning started."
}

/// Announcement for a newly found entity
pub fn entity_phrase(label: &str, tier: ConfidenceTier, verbosity: Verbosity) -> String {
    let label = label.trim();
    match verbosity {
        Verbosity::Brief => label.to_string(),
        Verbosity::Detailed => match tier {
            ConfidenceTier::High => format!("{} detected", label),
            ConfidenceTier::Medium => format!("likely {}", label),
            ConfidenceTier::Low => format!("possibly {}", label),
        },
    }
}

/// End-of-session utterance
pub fn summary_message(reason: StopReason, entities: &[String]) -> String {
    let found = found_sentence(entities);
    match reason {
        StopReason::AutoStop => format!("Scan complete. {}", found),
        StopReason::Manual => format!("Scan stopped. {}", found),
        StopReason::PermissionDenied => {
            format!("Camera permission is no longer available. Scan stopped. {}", found)
        }
        StopReason::RepeatedFailures => {
            format!("Having trouble detecting objects. Scan stopped. {}", found)
        }
        StopReason::Fault => format!("Scanning ran into a problem and stopped. {}", found),
    }
}

fn found_sentence(entities: &[String]) -> String {
    match entities.len() {
        0 => "No objects found.".to_string(),
        1 => format!("Found 1 object: {}.", entities[0]),
        n => format!("Found {} objects: {}.", n, join_labels(entities)),
    }
}

/// "a", "a and b", "a, b and c"
fn join_labels(labels: &[String]) -> String {
    match labels {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
