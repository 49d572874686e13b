//! Scan lifecycle states

use crate::phrases;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The user asked to stop
    Manual,
    /// The maximum session length elapsed
    AutoStop,
    /// Camera access was revoked
    PermissionDenied,
    /// Too many consecutive detection failures
    RepeatedFailures,
    /// A session task crashed
    Fault,
}

impl StopReason {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StopReason::PermissionDenied | StopReason::RepeatedFailures | StopReason::Fault
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopReason::Manual => "manual",
            StopReason::AutoStop => "auto_stop",
            StopReason::PermissionDenied => "permission_denied",
            StopReason::RepeatedFailures => "repeated_failures",
            StopReason::Fault => "fault",
        };
        f.write_str(name)
    }
}

/// Snapshot taken at the moment a session starts stopping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub reason: StopReason,
    pub entities: Vec<String>,
    /// Utterance spoken once the queue has drained
    pub message: String,
}

impl ScanSummary {
    pub fn new(reason: StopReason, entities: Vec<String>) -> Self {
        let message = phrases::summary_message(reason, &entities);
        Self {
            reason,
            entities,
            message,
        }
    }
}

/// Authoritative controller state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning {
        started_at: DateTime<Utc>,
        entity_count: usize,
    },
    Stopping {
        summary: ScanSummary,
    },
}

impl ScanState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ScanState::Idle)
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self, ScanState::Scanning { .. })
    }

    pub fn is_stopping(&self) -> bool {
        matches!(self, ScanState::Stopping { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Scanning { .. } => "scanning",
            ScanState::Stopping { .. } => "stopping",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        let idle = ScanState::default();
        assert!(idle.is_idle());
        assert_eq!(idle.name(), "idle");

        let scanning = ScanState::Scanning {
            started_at: Utc::now(),
            entity_count: 0,
        };
        assert!(scanning.is_scanning());
        assert!(!scanning.is_idle());

        let stopping = ScanState::Stopping {
            summary: ScanSummary::new(StopReason::Manual, vec![]),
        };
        assert!(stopping.is_stopping());
        assert_eq!(stopping.name(), "stopping");
    }

    #[test]
    fn test_fatal_reasons() {
        assert!(!StopReason::Manual.is_fatal());
        assert!(!StopReason::AutoStop.is_fatal());
        assert!(StopReason::PermissionDenied.is_fatal());
        assert!(StopReason::RepeatedFailures.is_fatal());
        assert!(StopReason::Fault.is_fatal());
    }

    #[test]
    fn test_summary_carries_message() {
        let summary = ScanSummary::new(StopReason::AutoStop, vec!["chair".to_string()]);
        assert!(summary.message.to_lowercase().contains("scan complete"));
        assert!(summary.message.contains("chair"));
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(StopReason::AutoStop.to_string(), "auto_stop");
        assert_eq!(StopReason::RepeatedFailures.to_string(), "repeated_failures");
    }
}
