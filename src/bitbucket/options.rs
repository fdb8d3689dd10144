//! Per-call deadline and cancellation controls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::error::ClientError;

/// Shared flag a caller can flip to stop further requests of a call.
///
/// Cancellation is checked before each request is dispatched. A request that
/// is already in flight runs to completion or to its deadline.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True once [`CancellationToken::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Options supplied alongside each API operation.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl CallOptions {
    /// Options without a deadline or cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline applied to each HTTP request of the call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Per-request deadline, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Fails with [`ClientError::Cancelled`] once the token has fired.
    pub(crate) fn ensure_not_cancelled(&self) -> Result<(), ClientError> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Err(ClientError::Cancelled);
        }
        Ok(())
    }
}
