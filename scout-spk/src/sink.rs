//! Speech output seam

use crate::error::SpeechError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Result of a completed utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechOutcome {
    pub latency: Duration,
}

/// Trait for speech output.
///
/// `announce` resolves once the utterance has finished playing, so callers
/// can pace consecutive announcements.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    async fn announce(&self, text: &str) -> Result<SpeechOutcome, SpeechError>;

    /// Get sink name
    fn name(&self) -> &str {
        "speech"
    }
}

type SpeakFn = dyn Fn(&str) -> Result<(), SpeechError> + Send + Sync;

/// Speech sink backed by a synchronous callback
pub struct CallbackSink {
    name: String,
    speak_fn: Arc<SpeakFn>,
}

impl CallbackSink {
    pub fn new<F>(name: impl Into<String>, speak_fn: F) -> Self
    where
        F: Fn(&str) -> Result<(), SpeechError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            speak_fn: Arc::new(speak_fn),
        }
    }
}

#[async_trait]
impl SpeechSink for CallbackSink {
    async fn announce(&self, text: &str) -> Result<SpeechOutcome, SpeechError> {
        let started = Instant::now();
        (self.speak_fn)(text)?;
        Ok(SpeechOutcome {
            latency: started.elapsed(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sink that writes utterances to the log instead of an audio device
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl SpeechSink for LogSink {
    async fn announce(&self, text: &str) -> Result<SpeechOutcome, SpeechError> {
        info!(target: "scout::speech", "{}", text);
        Ok(SpeechOutcome {
            latency: Duration::ZERO,
        })
    }

    fn name(&self) -> &str {
        "log"
    }
}
