//! Bounded hand-off between detection and speech

use crate::error::SpeechError;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Bounded FIFO of ready-to-speak announcements.
///
/// The sending half never blocks: a full queue rejects the item and the
/// caller decides what to log. Closing the sender lets the receiver drain
/// everything already queued before it reports the end of the stream.
pub struct AnnouncementQueue;

impl AnnouncementQueue {
    pub fn bounded(capacity: usize) -> (AnnouncementSender, AnnouncementReceiver) {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        (
            AnnouncementSender {
                tx: Arc::new(Mutex::new(Some(tx))),
                capacity,
            },
            AnnouncementReceiver { rx },
        )
    }
}

/// Producer half; clones share one underlying channel
#[derive(Clone)]
pub struct AnnouncementSender {
    tx: Arc<Mutex<Option<mpsc::Sender<String>>>>,
    capacity: usize,
}

impl AnnouncementSender {
    /// Enqueue without waiting
    pub fn try_send(&self, text: impl Into<String>) -> Result<(), SpeechError> {
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(SpeechError::QueueClosed)?;
        match tx.try_send(text.into()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SpeechError::QueueFull {
                capacity: self.capacity,
            }),
            Err(TrySendError::Closed(_)) => Err(SpeechError::QueueClosed),
        }
    }

    /// Stop accepting input. Returns false if the queue was already closed.
    pub fn close(&self) -> bool {
        self.tx.lock().take().is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.lock().as_ref().map_or(true, |tx| tx.is_closed())
    }

    /// Items waiting to be spoken
    pub fn pending(&self) -> usize {
        self.tx
            .lock()
            .as_ref()
            .map_or(0, |tx| self.capacity - tx.capacity())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Consumer half
pub struct AnnouncementReceiver {
    rx: mpsc::Receiver<String>,
}

impl AnnouncementReceiver {
    /// Next announcement, or `None` once closed and drained
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}
