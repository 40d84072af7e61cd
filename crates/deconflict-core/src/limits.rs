//! Deadline and cancellation bounds for long-running checks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::EngineError;

/// Shared flag that stops a running check at the next reference mission.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Bounds checked between reference-mission comparisons.
#[derive(Debug, Clone, Default)]
pub struct CheckLimits {
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl CheckLimits {
    /// No deadline, no cancellation.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail if the check must stop before comparing reference mission `reference_index`.
    pub fn check(&self, reference_index: usize) -> Result<(), EngineError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(EngineError::Cancelled { reference_index });
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(EngineError::DeadlineExceeded { reference_index });
        }
        Ok(())
    }
}
