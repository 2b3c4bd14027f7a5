//! Cooperative cancellation.
//!
//! The optimizers poll a [`CancelToken`] once per GA generation and once per
//! allocator enumeration step. A tripped token makes the running call return
//! [`RoutingError::Cancelled`](crate::error::RoutingError::Cancelled); no
//! partially built result escapes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, RoutingError};

/// Shared stop flag. Clones observe the same flag.
///
/// # Examples
///
/// ```
/// use u_shuttle::cancel::CancelToken;
///
/// let token = CancelToken::new();
/// let worker_view = token.clone();
/// assert!(!worker_view.is_cancelled());
/// token.cancel();
/// assert!(worker_view.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    stopped: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every run observing this token.
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

/// Returns `Err(Cancelled)` if an optional token has been tripped.
pub(crate) fn checkpoint(token: Option<&CancelToken>) -> Result<()> {
    match token {
        Some(t) if t.is_cancelled() => Err(RoutingError::Cancelled),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint() {
        assert!(checkpoint(None).is_ok());
        let token = CancelToken::new();
        assert!(checkpoint(Some(&token)).is_ok());
        token.cancel();
        assert_eq!(checkpoint(Some(&token)), Err(RoutingError::Cancelled));
    }

    #[test]
    fn test_cancel_is_shared_across_threads() {
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel())
            .join()
            .expect("thread panicked");
        assert!(token.is_cancelled());
    }
}
