//! Cooperative cancellation shared by all pipeline stages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable cancellation flag.
///
/// Tripped once, observed by every stage at its next polling point:
/// the reader between chunks, workers between dequeue and processing,
/// the writer between receive and write.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the flag. Idempotent.
    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_once_and_stays() {
        let token = CancelToken::new();
        let observer = token.clone();

        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
