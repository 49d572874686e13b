//! Scan session controller
//!
//! Owns the lifecycle `Idle -> Scanning -> Stopping -> Idle`. Every
//! lifecycle transition happens under the session lock, together with the
//! registration or removal of that session's stop channel. Exactly one of the
//! competing stop paths (manual, auto-stop timer, fatal detection error, task
//! fault) wins and the summary is spoken once.

use crate::capture;
use crate::error::ScanError;
use crate::haptics::{HapticSink, NoHaptics};
use crate::phrases;
use crate::preferences::PreferenceSource;
use crate::session::{ScanReport, Session};
use crate::state::{ScanState, ScanSummary, StopReason};
use chrono::Utc;
use parking_lot::Mutex;
use scout_core::{ScanConfig, ScanMode, Verbosity};
use scout_eye::{DetectionPipeline, Detector, EntityTracker};
use scout_spk::{AnnouncementConsumer, AnnouncementQueue, AnnouncementSender, ConsumerReport, SpeechSink};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Handle to the scanner. Clones share one controller.
#[derive(Clone)]
pub struct ScanController {
    inner: Arc<ControllerInner>,
}

pub(crate) struct ControllerInner {
    pub(crate) config: ScanConfig,
    pub(crate) detector: Arc<dyn Detector>,
    speech: Arc<dyn SpeechSink>,
    pub(crate) haptics: Arc<dyn HapticSink>,
    pub(crate) preferences: Arc<dyn PreferenceSource>,
    pub(crate) pipeline: DetectionPipeline,
    pub(crate) tracker: Arc<EntityTracker>,
    pub(crate) state: watch::Sender<ScanState>,
    active: Mutex<Option<ActiveSession>>,
    last_report: Mutex<Option<ScanReport>>,
}

struct ActiveSession {
    session: Arc<Session>,
    stop_tx: Option<oneshot::Sender<StopReason>>,
}

/// Tasks torn down together when a session ends
struct SessionTasks {
    capture: JoinHandle<()>,
    consumer: JoinHandle<ConsumerReport>,
    auto_stop: JoinHandle<()>,
    queue: AnnouncementSender,
    shutdown: watch::Sender<bool>,
}

/// Builder for [`ScanController`]
pub struct ScanControllerBuilder {
    config: ScanConfig,
    detector: Arc<dyn Detector>,
    speech: Arc<dyn SpeechSink>,
    haptics: Arc<dyn HapticSink>,
    preferences: Arc<dyn PreferenceSource>,
    tracker: Arc<EntityTracker>,
}

impl ScanControllerBuilder {
    pub fn haptics(mut self, haptics: Arc<dyn HapticSink>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn preferences(mut self, preferences: Arc<dyn PreferenceSource>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn mode(mut self, mode: ScanMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Share a tracker with other readers
    pub fn tracker(mut self, tracker: Arc<EntityTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn build(self) -> Result<ScanController, ScanError> {
        self.config.validate().map_err(ScanError::Config)?;
        let pipeline = DetectionPipeline::from_config(&self.config, self.config.mode)?;
        let (state, _) = watch::channel(ScanState::Idle);

        info!(
            mode = ?self.config.mode,
            detector = self.detector.name(),
            speech = self.speech.name(),
            "Scan controller ready"
        );

        Ok(ScanController {
            inner: Arc::new(ControllerInner {
                config: self.config,
                detector: self.detector,
                speech: self.speech,
                haptics: self.haptics,
                preferences: self.preferences,
                pipeline,
                tracker: self.tracker,
                state,
                active: Mutex::new(None),
                last_report: Mutex::new(None),
            }),
        })
    }
}

impl ScanController {
    /// Controller with no haptics and brief announcements
    pub fn new(
        config: ScanConfig,
        detector: Arc<dyn Detector>,
        speech: Arc<dyn SpeechSink>,
    ) -> Result<Self, ScanError> {
        Self::builder(config, detector, speech).build()
    }

    pub fn builder(
        config: ScanConfig,
        detector: Arc<dyn Detector>,
        speech: Arc<dyn SpeechSink>,
    ) -> ScanControllerBuilder {
        ScanControllerBuilder {
            config,
            detector,
            speech,
            haptics: Arc::new(NoHaptics),
            preferences: Arc::new(Verbosity::Brief),
            tracker: Arc::new(EntityTracker::new()),
        }
    }

    /// Begin a session. Must be called from within a Tokio runtime.
    ///
    /// Fails with [`ScanError::AlreadyActive`] unless the controller is idle;
    /// the running session is left untouched.
    pub fn start(&self) -> Result<Uuid, ScanError> {
        let handle = Handle::try_current().map_err(|e| ScanError::NoRuntime(e.to_string()))?;
        let inner = &self.inner;
        let started_at = Utc::now();

        // The session lock is held across the flip, and `request_stop` takes it
        // too, so a stop never observes Scanning without a registered channel.
        let mut active = inner.active.lock();
        if !inner.state.borrow().is_idle() {
            let current = inner.state.borrow().name();
            debug!(state = current, "Start ignored, scan already active");
            return Err(ScanError::AlreadyActive(current));
        }

        inner.tracker.reset();
        let session = Arc::new(Session::new(started_at, inner.config.max_session()));
        let (stop_tx, stop_rx) = oneshot::channel();
        *active = Some(ActiveSession {
            session: session.clone(),
            stop_tx: Some(stop_tx),
        });
        inner.state.send_replace(ScanState::Scanning {
            started_at,
            entity_count: 0,
        });
        drop(active);

        let (queue, receiver) = AnnouncementQueue::bounded(inner.config.queue_capacity);
        if let Err(e) = queue.try_send(phrases::start_message()) {
            warn!(session_id = %session.id, "Start announcement not queued: {}", e);
        }

        let consumer = handle.spawn(
            AnnouncementConsumer::new(inner.speech.clone(), inner.config.announcement_gap())
                .run(receiver),
        );

        let (shutdown, shutdown_rx) = watch::channel(false);
        let capture = handle.spawn(capture::run(
            inner.clone(),
            session.clone(),
            queue.clone(),
            shutdown_rx,
        ));

        let auto_stop = handle.spawn({
            let inner = inner.clone();
            let max_length = inner.config.max_session();
            async move {
                tokio::time::sleep(max_length).await;
                info!(secs = max_length.as_secs(), "Maximum session length reached");
                inner.request_stop(StopReason::AutoStop);
            }
        });

        let tasks = SessionTasks {
            capture,
            consumer,
            auto_stop,
            queue,
            shutdown,
        };
        handle.spawn(supervise(inner.clone(), session.clone(), tasks, stop_rx));

        info!(
            session_id = %session.id,
            mode = ?inner.config.mode,
            deadline = %session.auto_stop_deadline,
            "Scan started"
        );
        Ok(session.id)
    }

    /// Stop the running session and wait for its summary to be spoken.
    ///
    /// Returns `None` when nothing was scanning or another stop already won.
    pub async fn stop(&self) -> Option<ScanReport> {
        if !self.inner.request_stop(StopReason::Manual) {
            return None;
        }
        self.wait_until_idle().await;
        self.last_report()
    }

    pub fn state(&self) -> ScanState {
        self.inner.state.borrow().clone()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.inner.state.subscribe()
    }

    pub fn is_scanning(&self) -> bool {
        self.inner.is_scanning()
    }

    /// Entities announced in the current or most recent session
    pub fn tracker(&self) -> Arc<EntityTracker> {
        self.inner.tracker.clone()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.inner.config
    }

    pub fn active_session(&self) -> Option<Uuid> {
        self.inner.active.lock().as_ref().map(|a| a.session.id)
    }

    pub async fn wait_until_idle(&self) {
        let mut rx = self.inner.state.subscribe();
        let _ = rx.wait_for(ScanState::is_idle).await;
    }

    /// Report of the most recently finished session
    pub fn last_report(&self) -> Option<ScanReport> {
        self.inner.last_report.lock().clone()
    }
}

impl ControllerInner {
    pub(crate) fn is_scanning(&self) -> bool {
        self.state.borrow().is_scanning()
    }

    /// Move `Scanning -> Stopping` and hand the reason to the supervisor.
    ///
    /// The summary snapshot is taken under the same lock as the transition,
    /// so it contains every entity the capture loop committed before it.
    /// Returns false if the session was not scanning.
    pub(crate) fn request_stop(&self, reason: StopReason) -> bool {
        let mut active = self.active.lock();
        let won = self.state.send_if_modified(|state| {
            if !state.is_scanning() {
                return false;
            }
            *state = ScanState::Stopping {
                summary: ScanSummary::new(reason, self.tracker.all()),
            };
            true
        });

        if !won {
            debug!(%reason, "Stop request ignored, no scan in progress");
            return false;
        }

        let stop_tx = active.as_mut().and_then(|a| a.stop_tx.take());
        drop(active);
        match stop_tx {
            Some(tx) => {
                if tx.send(reason).is_err() {
                    warn!(%reason, "Session supervisor is gone");
                }
            }
            None => warn!(%reason, "No stop channel registered for session"),
        }
        info!(%reason, "Scan stopping");
        true
    }

    fn current_summary(&self, reason: StopReason) -> ScanSummary {
        match &*self.state.borrow() {
            ScanState::Stopping { summary } => summary.clone(),
            _ => ScanSummary::new(reason, self.tracker.all()),
        }
    }
}

/// Waits for a stop, then tears the session down in order: stop capturing,
/// drain the queue, speak the summary, go idle.
async fn supervise(
    inner: Arc<ControllerInner>,
    session: Arc<Session>,
    mut tasks: SessionTasks,
    mut stop_rx: oneshot::Receiver<StopReason>,
) {
    let mut capture_done = false;
    let mut consumer_result: Option<Result<ConsumerReport, JoinError>> = None;

    let requested = tokio::select! {
        reason = &mut stop_rx => reason.ok(),
        joined = &mut tasks.capture => {
            capture_done = true;
            log_join("capture loop", &joined);
            None
        }
        joined = &mut tasks.consumer => {
            log_join("announcement consumer", &joined);
            consumer_result = Some(joined);
            None
        }
    };

    let reason = match requested {
        Some(reason) => reason,
        None => {
            // A task ended before any stop was requested; no-op if one already was
            inner.request_stop(StopReason::Fault);
            (&mut stop_rx).await.unwrap_or(StopReason::Fault)
        }
    };
    debug!(session_id = %session.id, %reason, "Tearing down session");

    let _ = tasks.shutdown.send(true);
    tasks.auto_stop.abort();
    if !capture_done {
        let joined = (&mut tasks.capture).await;
        log_join("capture loop", &joined);
    }

    tasks.queue.close();
    let consumer_result = match consumer_result {
        Some(result) => result,
        None => tasks.consumer.await,
    };
    let mut speech = consumer_result.unwrap_or_default();

    let summary = inner.current_summary(reason);
    // Spoken on its own task so a panicking sink cannot strand the session
    let announce = tokio::spawn({
        let sink = inner.speech.clone();
        let message = summary.message.clone();
        async move { sink.announce(&message).await }
    });
    match announce.await {
        Ok(Ok(_)) => speech.spoken += 1,
        Ok(Err(e)) => {
            speech.failed += 1;
            warn!(session_id = %session.id, "Summary announcement failed: {}", e);
        }
        Err(e) => {
            speech.failed += 1;
            error!(session_id = %session.id, panicked = e.is_panic(), "Summary announcement task failed");
        }
    }

    let report = ScanReport::new(&session, &summary, speech);
    info!(
        session_id = %session.id,
        reason = %report.reason,
        entities = report.entities.len(),
        ticks = report.ticks,
        failed_ticks = report.failed_ticks,
        dropped = report.dropped_announcements,
        "Scan finished"
    );

    *inner.last_report.lock() = Some(report);
    let mut active = inner.active.lock();
    *active = None;
    inner.state.send_replace(ScanState::Idle);
}

fn log_join<T>(task: &str, joined: &Result<T, JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(task, "Session task panicked");
        } else {
            warn!(task, "Session task cancelled");
        }
    }
}
