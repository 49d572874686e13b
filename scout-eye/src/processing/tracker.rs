//! Session-scoped tracking of already-announced entities

use parking_lot::RwLock;
use scout_core::normalize_label;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
struct TrackerState {
    /// Normalized keys for membership checks
    seen: HashSet<String>,
    /// Labels as first reported, in first-seen order
    order: Vec<String>,
}

/// Set of labels announced during the current session.
///
/// Labels compare case-insensitively and ignore surrounding whitespace, so
/// "Chair", "chair" and "CHAIR" are one entity. Written by the capture loop
/// only; any number of readers may query it concurrently.
#[derive(Debug, Default)]
pub struct EntityTracker {
    state: RwLock<TrackerState>,
}

impl EntityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the label has not been announced this session
    pub fn is_new(&self, label: &str) -> bool {
        !self.state.read().seen.contains(&normalize_label(label))
    }

    /// Record a label. Returns true if it was not already tracked.
    pub fn add(&self, label: &str) -> bool {
        let key = normalize_label(label);
        if key.is_empty() {
            return false;
        }

        let mut state = self.state.write();
        if !state.seen.insert(key) {
            return false;
        }
        state.order.push(label.trim().to_string());
        debug!(label = %label.trim(), total = state.order.len(), "Tracking new entity");
        true
    }

    /// Forget every label; called when a session starts
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.seen.clear();
        state.order.clear();
    }

    pub fn count(&self) -> usize {
        self.state.read().order.len()
    }

    /// All tracked labels in the order they were first seen
    pub fn all(&self) -> Vec<String> {
        self.state.read().order.clone()
    }
}
