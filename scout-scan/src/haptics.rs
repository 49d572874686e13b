//! Haptic feedback collaborator

use scout_core::HapticPattern;
use tracing::warn;

/// Fire-and-forget tactile cue.
///
/// Failures are reported back but never affect scanning.
#[cfg_attr(test, mockall::automock)]
pub trait HapticSink: Send + Sync {
    fn trigger(&self, pattern: HapticPattern) -> scout_core::Result<()>;
}

/// Sink for devices without a vibration motor
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticSink for NoHaptics {
    fn trigger(&self, _pattern: HapticPattern) -> scout_core::Result<()> {
        Ok(())
    }
}

/// Trigger a cue, logging and discarding any error
pub(crate) fn pulse(sink: &dyn HapticSink, pattern: HapticPattern) {
    if let Err(e) = sink.trigger(pattern) {
        warn!(?pattern, error = %e, "Haptic feedback failed");
    }
}
