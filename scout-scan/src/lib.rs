//! Continuous scan controller
//!
//! Drives a [`scout_eye::Detector`] on a fixed tick, announces each newly
//! seen entity once through a bounded speech queue, and speaks a summary when
//! the session ends for any reason.

mod capture;
pub mod breaker;
pub mod controller;
pub mod error;
pub mod haptics;
pub mod phrases;
pub mod preferences;
pub mod session;
pub mod state;

pub use breaker::{BreakerState, ErrorBreaker};
pub use controller::{ScanController, ScanControllerBuilder};
pub use error::ScanError;
pub use haptics::{HapticSink, NoHaptics};
pub use preferences::{PreferenceSource, VerbosityPreference};
pub use session::{ScanReport, Session, SessionStats};
pub use state::{ScanState, ScanSummary, StopReason};
