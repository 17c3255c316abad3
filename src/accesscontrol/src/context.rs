//! Per-request resolution context
//!
//! Carries the caller's cancellation signal and deadline into attribute
//! resolvers, which may block on external stores.

use crate::error::{AccessControlError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Context of the request a scope is resolved for
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request identifier, for log correlation
    pub request_id: Uuid,

    /// Cancelled when the caller gives up on the request
    cancel: CancellationToken,

    /// Point in time after which resolution is abandoned
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Create a context with no deadline and a fresh cancellation token
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Bind to an existing cancellation token (e.g., the HTTP request's)
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancel every resolution running under this context
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The context deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Earliest of the context deadline and `now + timeout`
    fn effective_deadline(&self, timeout: Option<Duration>) -> Option<Instant> {
        let bounded = timeout.map(|t| Instant::now() + t);
        match (self.deadline, bounded) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drive `future` until it completes, the context is cancelled, or the
    /// effective deadline passes. Aborts without retrying.
    pub async fn run<F, T>(&self, future: F, timeout: Option<Duration>) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(AccessControlError::Cancelled);
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(AccessControlError::Cancelled),
                result = future => result,
            }
        };

        match self.effective_deadline(timeout) {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(AccessControlError::DeadlineExceeded)),
            None => guarded.await,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
