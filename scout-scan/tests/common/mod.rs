// Shared fakes for controller tests
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use scout_core::{BoundingBox, Detection, DetectionFrame, HapticPattern, ScanConfig};
use scout_eye::{Detector, VisionError};
use scout_scan::HapticSink;
use scout_spk::{SpeechError, SpeechOutcome, SpeechSink};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn det(label: &str, confidence: f32, offset: f32) -> Detection {
    Detection::new(
        label,
        confidence,
        BoundingBox::new(offset, offset, offset + 0.05, offset + 0.05),
    )
}

/// One scripted detector response
pub enum Step {
    Frame(Vec<Detection>),
    Fail,
    Revoked,
    /// Sleep before returning the frame
    Slow(Duration, Vec<Detection>),
    Panic,
}

/// Replays a script; once exhausted every call returns an empty frame
#[derive(Default)]
pub struct ScriptedDetector {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Detector for ScriptedDetector {
    async fn detect(&self) -> Result<DetectionFrame, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().pop_front();
        match step {
            None => Ok(DetectionFrame::empty()),
            Some(Step::Frame(detections)) => Ok(DetectionFrame::new(detections, 40)),
            Some(Step::Fail) => Err(VisionError::Detector("model crashed".to_string())),
            Some(Step::Revoked) => Err(VisionError::PermissionDenied("camera revoked".to_string())),
            Some(Step::Slow(delay, detections)) => {
                tokio::time::sleep(delay).await;
                Ok(DetectionFrame::new(detections, delay.as_millis() as u64))
            }
            Some(Step::Panic) => panic!("detector blew up"),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Detector whose every call hangs for the given duration
pub struct HangingDetector {
    delay: Duration,
    calls: AtomicUsize,
}

impl HangingDetector {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Detector for HangingDetector {
    async fn detect(&self) -> Result<DetectionFrame, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(DetectionFrame::empty())
    }
}

/// Records utterances; each takes `latency` to "play"
pub struct RecordingSink {
    spoken: Mutex<Vec<String>>,
    latency: Duration,
}

impl RecordingSink {
    pub fn new(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
            latency,
        })
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.spoken.lock().last().cloned()
    }
}

#[async_trait]
impl SpeechSink for RecordingSink {
    async fn announce(&self, text: &str) -> Result<SpeechOutcome, SpeechError> {
        tokio::time::sleep(self.latency).await;
        self.spoken.lock().push(text.to_string());
        Ok(SpeechOutcome {
            latency: self.latency,
        })
    }
}

#[derive(Default)]
pub struct CountingHaptics {
    pub new_entity: AtomicUsize,
    pub warning: AtomicUsize,
}

impl HapticSink for CountingHaptics {
    fn trigger(&self, pattern: HapticPattern) -> scout_core::Result<()> {
        match pattern {
            HapticPattern::NewEntity => self.new_entity.fetch_add(1, Ordering::SeqCst),
            HapticPattern::Warning => self.warning.fetch_add(1, Ordering::SeqCst),
        };
        Ok(())
    }
}

pub fn config() -> ScanConfig {
    ScanConfig::default()
}

/// Speaks normally but panics on any manual-stop summary
pub struct PanicOnSummarySink {
    pub spoken: AtomicUsize,
}

impl PanicOnSummarySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            spoken: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SpeechSink for PanicOnSummarySink {
    async fn announce(&self, text: &str) -> Result<SpeechOutcome, SpeechError> {
        if text.starts_with("Scan stopped") {
            panic!("speech engine crashed");
        }
        self.spoken.fetch_add(1, Ordering::SeqCst);
        Ok(SpeechOutcome {
            latency: Duration::ZERO,
        })
    }
}
