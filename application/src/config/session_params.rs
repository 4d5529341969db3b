//! Session parameters for the registry and the send loop
//!
//! [`SessionParams`] groups the static parameters shared by every session a
//! [`SessionRegistry`](crate::engine::SessionRegistry) creates. These are
//! application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Registry and backend-call control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Sessions idle for longer than this are evicted on the next registry access.
    pub ttl: Duration,
    /// Upper bound for a single backend call. `None` waits indefinitely.
    pub send_timeout: Option<Duration>,
    /// Retries for transient backend errors (0 disables retrying).
    pub max_retries: usize,
    /// Delay before the first retry; doubled for every further retry.
    pub retry_backoff: Duration,
    /// Nesting depth at which validating sessions stop running their own validators.
    pub max_validation_depth: usize,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(86_400),
            send_timeout: Some(Duration::from_secs(120)),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            max_validation_depth: 3,
        }
    }
}

impl SessionParams {
    // ==================== Builder Methods ====================

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_send_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_validation_depth(mut self, depth: usize) -> Self {
        self.max_validation_depth = depth;
        self
    }

    /// Backoff before retry number `attempt` (0-based)
    pub fn backoff_for(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.retry_backoff.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = SessionParams::default();
        assert_eq!(params.ttl, Duration::from_secs(86_400));
        assert_eq!(params.send_timeout, Some(Duration::from_secs(120)));
        assert_eq!(params.max_retries, 2);
        assert_eq!(params.max_validation_depth, 3);
    }

    #[test]
    fn test_builder() {
        let params = SessionParams::default()
            .with_ttl(Duration::from_secs(60))
            .with_send_timeout(None)
            .with_max_retries(0);

        assert_eq!(params.ttl, Duration::from_secs(60));
        assert!(params.send_timeout.is_none());
        assert_eq!(params.max_retries, 0);
    }

    #[test]
    fn test_backoff_doubles() {
        let params = SessionParams::default().with_retry_backoff(Duration::from_millis(100));
        assert_eq!(params.backoff_for(0), Duration::from_millis(100));
        assert_eq!(params.backoff_for(1), Duration::from_millis(200));
        assert_eq!(params.backoff_for(3), Duration::from_millis(800));
    }
}
