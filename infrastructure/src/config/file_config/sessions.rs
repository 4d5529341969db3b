//! Session engine configuration from TOML (`[sessions]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use verdict_application::SessionParams;

/// Raw session engine configuration from TOML
///
/// # Example
///
/// ```toml
/// [sessions]
/// ttl_secs = 86400
/// send_timeout_secs = 120    # 0 disables the per-call timeout
/// max_retries = 2
/// retry_backoff_ms = 500
/// max_validation_depth = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionsConfig {
    pub ttl_secs: u64,
    pub send_timeout_secs: u64,
    pub max_retries: usize,
    pub retry_backoff_ms: u64,
    pub max_validation_depth: usize,
}

impl Default for FileSessionsConfig {
    fn default() -> Self {
        let params = SessionParams::default();
        Self {
            ttl_secs: params.ttl.as_secs(),
            send_timeout_secs: params.send_timeout.map_or(0, |t| t.as_secs()),
            max_retries: params.max_retries,
            retry_backoff_ms: params.retry_backoff.as_millis() as u64,
            max_validation_depth: params.max_validation_depth,
        }
    }
}

impl FileSessionsConfig {
    pub fn send_timeout(&self) -> Option<Duration> {
        (self.send_timeout_secs > 0).then(|| Duration::from_secs(self.send_timeout_secs))
    }

    pub fn to_session_params(&self) -> SessionParams {
        SessionParams::default()
            .with_ttl(Duration::from_secs(self.ttl_secs))
            .with_send_timeout(self.send_timeout())
            .with_max_retries(self.max_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_max_validation_depth(self.max_validation_depth)
    }
}
