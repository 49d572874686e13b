//! Periodic capture loop

use crate::breaker::{BreakerState, ErrorBreaker};
use crate::controller::ControllerInner;
use crate::haptics::pulse;
use crate::phrases;
use crate::session::Session;
use crate::state::{ScanState, StopReason};
use scout_core::{DetectionFrame, FilteredDetection, HapticPattern};
use scout_eye::VisionError;
use scout_spk::{AnnouncementSender, SpeechError};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, error, warn};

enum TickOutcome {
    Continue,
    Stop(StopReason),
}

/// Run one detect per tick until shutdown is signalled or a fatal stop.
///
/// A tick that is in flight when shutdown arrives finishes first; the next
/// one never starts. Ticks never overlap.
pub(crate) async fn run(
    inner: Arc<ControllerInner>,
    session: Arc<Session>,
    queue: AnnouncementSender,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(inner.config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut breaker = ErrorBreaker::new(inner.config.max_consecutive_errors);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        if *shutdown.borrow() || !inner.is_scanning() {
            break;
        }

        if let TickOutcome::Stop(reason) = tick(&inner, &session, &queue, &mut breaker).await {
            inner.request_stop(reason);
            break;
        }
    }

    debug!(session_id = %session.id, ticks = session.stats.ticks(), "Capture loop exited");
}

async fn tick(
    inner: &ControllerInner,
    session: &Session,
    queue: &AnnouncementSender,
    breaker: &mut ErrorBreaker,
) -> TickOutcome {
    session.stats.record_tick();
    let limit = inner.config.detect_timeout();

    let result = match timeout(limit, inner.detector.detect()).await {
        Ok(result) => result,
        Err(_) => Err(VisionError::Timeout(limit)),
    };

    // A stop landed while the detector was busy
    if !inner.is_scanning() {
        debug!(session_id = %session.id, "Discarding detection result from stopped session");
        return TickOutcome::Continue;
    }

    match result {
        Ok(frame) => {
            breaker.record_success();
            session.stats.record_success();
            announce_new_entities(inner, session, queue, frame);
            TickOutcome::Continue
        }
        Err(e) if !e.is_retryable() => {
            session.stats.record_fatal();
            error!(session_id = %session.id, error = %e, "Detector unavailable, stopping scan");
            TickOutcome::Stop(StopReason::PermissionDenied)
        }
        Err(e) => match breaker.record_failure() {
            BreakerState::Closed(count) => {
                session.stats.record_failure(count);
                warn!(
                    session_id = %session.id,
                    consecutive = count,
                    error = %e,
                    "Detection failed"
                );
                TickOutcome::Continue
            }
            BreakerState::Tripped(count) => {
                session.stats.record_failure(count);
                error!(
                    session_id = %session.id,
                    consecutive = count,
                    error = %e,
                    "Too many consecutive detection failures, stopping scan"
                );
                pulse(inner.haptics.as_ref(), HapticPattern::Warning);
                TickOutcome::Stop(StopReason::RepeatedFailures)
            }
        },
    }
}

fn announce_new_entities(
    inner: &ControllerInner,
    session: &Session,
    queue: &AnnouncementSender,
    frame: DetectionFrame,
) {
    let processed = inner.pipeline.process(&frame.detections);
    if processed.is_empty() {
        return;
    }

    // Commit to the tracker under the state lock so a concurrent stop
    // either sees these entities in its summary or rejects them all.
    let mut fresh: Vec<FilteredDetection> = Vec::new();
    inner.state.send_if_modified(|state| {
        let ScanState::Scanning { entity_count, .. } = state else {
            return false;
        };
        for detection in processed {
            if inner.tracker.add(detection.label()) {
                fresh.push(detection);
            }
        }
        if fresh.is_empty() {
            return false;
        }
        *entity_count = inner.tracker.count();
        true
    });

    debug!(
        session_id = %session.id,
        latency_ms = frame.latency_ms,
        new = fresh.len(),
        "Processed detection frame"
    );

    for detection in fresh {
        pulse(inner.haptics.as_ref(), HapticPattern::NewEntity);

        let verbosity = inner.preferences.verbosity();
        let phrase = phrases::entity_phrase(detection.label(), detection.tier, verbosity);
        match queue.try_send(phrase) {
            Ok(()) => session.stats.record_enqueued(),
            Err(SpeechError::QueueFull { capacity }) => {
                session.stats.record_dropped();
                warn!(
                    session_id = %session.id,
                    label = detection.label(),
                    capacity,
                    "Announcement queue full, dropping"
                );
            }
            Err(e) => {
                session.stats.record_dropped();
                warn!(session_id = %session.id, label = detection.label(), "Announcement not queued: {}", e);
            }
        }
    }
}
