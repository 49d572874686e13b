//! Consecutive-failure circuit breaker

/// Result of recording a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    /// Still tolerating failures; holds the consecutive count
    Closed(u32),
    /// Threshold reached; the session must stop
    Tripped(u32),
}

/// Counts consecutive retryable failures. Any success resets the count.
#[derive(Debug, Clone)]
pub struct ErrorBreaker {
    threshold: u32,
    consecutive: u32,
}

impl ErrorBreaker {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn record_failure(&mut self) -> BreakerState {
        self.consecutive = self.consecutive.saturating_add(1);
        if self.consecutive >= self.threshold {
            BreakerState::Tripped(self.consecutive)
        } else {
            BreakerState::Closed(self.consecutive)
        }
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
