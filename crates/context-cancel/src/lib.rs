//! Cooperative cancellation primitive.
//!
//! A [`CancellationToken`] is a lightweight, clonable carrier of an
//! `is_cancellation_requested` flag. It never interrupts work on its own —
//! callers poll it between suspension points and decide what "cancelled"
//! means for their own return type (empty list, `None`, a neutral result).
//! There are no locks: the flag is a single `Arc<AtomicBool>`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owns the cancel switch. Call [`CancellationTokenSource::cancel`] to flip it;
/// every [`CancellationToken`] handed out from [`token`](Self::token) observes
/// the flip immediately.
#[derive(Debug, Default)]
pub struct CancellationTokenSource {
    flag: Arc<AtomicBool>,
}

impl CancellationTokenSource {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Hand out a token observing this source.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            flag: Some(Arc::clone(&self.flag)),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancellation_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Release this source. Outstanding tokens keep observing whatever state
    /// the flag was in at the moment of disposal; they simply stop being
    /// affected by future calls to `cancel` on this source (there can be none,
    /// since `self` is consumed).
    pub fn dispose(self) {}
}

/// A read-only handle on a cancellation flag. Cheap to clone and to pass by
/// value; operations that accept `Option<&CancellationToken>` treat `None`
/// identically to a token that is never cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Option<Arc<AtomicBool>>,
}

impl CancellationToken {
    /// A token that is never cancelled — for call sites that receive `token?`
    /// as `None` but want a concrete value to thread through.
    pub fn none() -> Self {
        Self { flag: None }
    }

    pub fn is_cancellation_requested(&self) -> bool {
        match &self.flag {
            Some(flag) => flag.load(Ordering::SeqCst),
            None => false,
        }
    }
}

/// Treats an absent token the same as [`CancellationToken::none`].
pub fn is_cancelled(token: Option<&CancellationToken>) -> bool {
    token.map(CancellationToken::is_cancellation_requested).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_source_is_not_cancelled() {
        let source = CancellationTokenSource::new();
        let token = source.token();
        assert!(!token.is_cancellation_requested());
    }

    #[test]
    fn cancel_propagates_to_existing_tokens() {
        let source = CancellationTokenSource::new();
        let token = source.token();
        source.cancel();
        assert!(token.is_cancellation_requested());
    }

    #[test]
    fn cancel_propagates_to_tokens_issued_after_cancel() {
        let source = CancellationTokenSource::new();
        source.cancel();
        let token = source.token();
        assert!(token.is_cancellation_requested());
    }

    #[test]
    fn none_token_is_never_cancelled() {
        assert!(!CancellationToken::none().is_cancellation_requested());
        assert!(!is_cancelled(None));
    }

    #[test]
    fn is_cancelled_reads_through_option() {
        let source = CancellationTokenSource::new();
        let token = source.token();
        assert!(!is_cancelled(Some(&token)));
        source.cancel();
        assert!(is_cancelled(Some(&token)));
    }
}
