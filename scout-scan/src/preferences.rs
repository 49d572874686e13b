//! Live user preferences

use scout_core::Verbosity;
use tokio::sync::watch;

/// Read at announcement time, so a change applies from the next entity on
pub trait PreferenceSource: Send + Sync {
    fn verbosity(&self) -> Verbosity;
}

impl PreferenceSource for Verbosity {
    fn verbosity(&self) -> Verbosity {
        *self
    }
}

impl PreferenceSource for watch::Receiver<Verbosity> {
    fn verbosity(&self) -> Verbosity {
        *self.borrow()
    }
}

/// Mutable verbosity setting shared between the UI and the controller
#[derive(Debug)]
pub struct VerbosityPreference {
    tx: watch::Sender<Verbosity>,
}

impl Default for VerbosityPreference {
    fn default() -> Self {
        Self::new(Verbosity::default())
    }
}

impl VerbosityPreference {
    pub fn new(initial: Verbosity) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn set(&self, verbosity: Verbosity) {
        self.tx.send_replace(verbosity);
    }

    pub fn subscribe(&self) -> watch::Receiver<Verbosity> {
        self.tx.subscribe()
    }
}

impl PreferenceSource for VerbosityPreference {
    fn verbosity(&self) -> Verbosity {
        *self.tx.borrow()
    }
}
