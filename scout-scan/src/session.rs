//! Per-session bookkeeping and the end-of-session report

use crate::state::{ScanSummary, StopReason};
use chrono::{DateTime, Utc};
use scout_spk::ConsumerReport;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Counters updated by the capture loop while a session runs
#[derive(Debug, Default)]
pub struct SessionStats {
    ticks: AtomicU64,
    failed_ticks: AtomicU64,
    consecutive_errors: AtomicU32,
    enqueued: AtomicU64,
    dropped: AtomicU64,
}

impl SessionStats {
    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, consecutive: u32) {
        self.failed_ticks.fetch_add(1, Ordering::Relaxed);
        self.consecutive_errors.store(consecutive, Ordering::Relaxed);
    }

    /// Failure that ends the session without touching the breaker count
    pub(crate) fn record_fatal(&self) {
        self.failed_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_success(&self) {
        self.consecutive_errors.store(0, Ordering::Relaxed);
    }

    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn failed_ticks(&self) -> u64 {
        self.failed_ticks.load(Ordering::Relaxed)
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors.load(Ordering::Relaxed)
    }

    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// One run of the scanner from start to idle
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub auto_stop_deadline: DateTime<Utc>,
    pub stats: SessionStats,
}

impl Session {
    pub fn new(started_at: DateTime<Utc>, max_length: Duration) -> Self {
        let max_length = chrono::Duration::from_std(max_length).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            id: Uuid::new_v4(),
            started_at,
            auto_stop_deadline: started_at + max_length,
            stats: SessionStats::default(),
        }
    }
}

/// What happened during a finished session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub session_id: Uuid,
    pub reason: StopReason,
    pub entities: Vec<String>,
    pub summary: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub ticks: u64,
    pub failed_ticks: u64,
    /// Retryable failures in a row when the session ended
    pub consecutive_errors: u32,
    /// Entity announcements accepted by the queue
    pub enqueued: u64,
    /// Entity announcements rejected because the queue was full
    pub dropped_announcements: u64,
    /// Utterances the speech sink completed, start message included
    pub spoken: usize,
    pub speech_failures: usize,
}

impl ScanReport {
    pub(crate) fn new(session: &Session, summary: &ScanSummary, speech: ConsumerReport) -> Self {
        Self {
            session_id: session.id,
            reason: summary.reason,
            entities: summary.entities.clone(),
            summary: summary.message.clone(),
            started_at: session.started_at,
            ended_at: Utc::now(),
            ticks: session.stats.ticks(),
            failed_ticks: session.stats.failed_ticks(),
            consecutive_errors: session.stats.consecutive_errors(),
            enqueued: session.stats.enqueued(),
            dropped_announcements: session.stats.dropped(),
            spoken: speech.spoken,
            speech_failures: speech.failed,
        }
    }
}
