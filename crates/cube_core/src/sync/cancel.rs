//! Cooperative cancellation for blocking lock waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{CubeError, CubeResult};

/// Shared cancellation flag.
///
/// Clone it, hand one copy to the thread calling into the cube and keep the
/// other. Calling [`CancelToken::cancel`] makes every wait that observes the
/// token give up, release what it holds and return [`CubeError::Cancelled`].
/// A cancelled token stays cancelled.
///
/// ## Usage
///
/// ```rust,ignore
/// let token = CancelToken::new();
/// let worker_token = token.clone();
/// let worker = thread::spawn(move || cube.rotate_with(0, 0, &worker_token));
///
/// token.cancel();
/// assert!(worker.join().unwrap().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once [`CancelToken::cancel`] was called on any clone.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` if cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Cancelled`] if the token is cancelled.
    #[inline]
    pub fn check(&self) -> CubeResult<()> {
        if self.is_cancelled() {
            Err(CubeError::Cancelled)
        } else {
            Ok(())
        }
    }
}
