//! Sequential speaker for queued announcements

use crate::queue::AnnouncementReceiver;
use crate::sink::SpeechSink;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Counts reported when the consumer exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    pub spoken: usize,
    pub failed: usize,
}

/// Speaks announcements one at a time with a fixed pause between them
pub struct AnnouncementConsumer {
    sink: Arc<dyn SpeechSink>,
    gap: Duration,
}

impl AnnouncementConsumer {
    pub fn new(sink: Arc<dyn SpeechSink>, gap: Duration) -> Self {
        Self { sink, gap }
    }

    /// Run until the queue is closed and empty
    pub async fn run(self, mut receiver: AnnouncementReceiver) -> ConsumerReport {
        let mut report = ConsumerReport::default();

        while let Some(text) = receiver.recv().await {
            match self.sink.announce(&text).await {
                Ok(outcome) => {
                    report.spoken += 1;
                    debug!(latency_ms = outcome.latency.as_millis() as u64, "Announced: {}", text);
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(sink = self.sink.name(), "Announcement failed: {}", e);
                }
            }

            if !self.gap.is_zero() {
                tokio::time::sleep(self.gap).await;
            }
        }

        debug!(
            spoken = report.spoken,
            failed = report.failed,
            "Announcement queue drained"
        );
        report
    }
}
