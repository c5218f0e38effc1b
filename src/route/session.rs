//! Stale-fetch guard for clients that fire a new request per submission.
//!
//! A new submission does not cancel the fetch already in flight, so two
//! responses can race. The tracker hands out monotonically increasing
//! tokens; a response is only applied when its token is still the latest
//! one issued, and stale responses are discarded.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

impl FetchToken {
    /// Numeric value, echoed back to clients so they can order responses
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FetchTracker {
    latest: AtomicU64,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, invalidating all previously issued tokens
    pub fn begin(&self) -> FetchToken {
        FetchToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a completed fetch still reflects the latest submission
    pub fn is_current(&self, token: FetchToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_token_is_current() {
        let tracker = FetchTracker::new();
        let token = tracker.begin();
        assert!(tracker.is_current(token));
    }

    #[test]
    fn new_fetch_invalidates_older_tokens() {
        let tracker = FetchTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn tokens_increase_monotonically() {
        let tracker = FetchTracker::new();
        let a = tracker.begin();
        let b = tracker.begin();
        let c = tracker.begin();
        assert!(a != b && b != c);
        assert!(tracker.is_current(c));
        assert!(!tracker.is_current(a));
    }
}
