//! scout-spk: announcement delivery for the scanning engine
//!
//! Provides:
//! - the `SpeechSink` seam to the platform speech engine
//! - a bounded, non-blocking announcement queue with drain-on-close
//! - a sequential consumer that paces announcements

pub mod consumer;
pub mod error;
pub mod queue;
pub mod sink;

pub use consumer::{AnnouncementConsumer, ConsumerReport};
pub use error::SpeechError;
pub use queue::{AnnouncementQueue, AnnouncementReceiver, AnnouncementSender};
pub use sink::{CallbackSink, LogSink, SpeechOutcome, SpeechSink};
