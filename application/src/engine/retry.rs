//! Backend calls with timeout and retry.

use crate::config::SessionParams;
use crate::ports::llm_gateway::{GatewayError, LlmSession};
use tracing::warn;

/// Send `content` through `conversation`, bounding each attempt by
/// `params.send_timeout` and retrying transient failures with exponential
/// backoff.
///
/// Permanent errors and the last transient error are returned as is.
pub async fn send_with_retry(
    conversation: &dyn LlmSession,
    content: &str,
    params: &SessionParams,
) -> Result<String, GatewayError> {
    let mut attempt = 0;

    loop {
        let result = match params.send_timeout {
            Some(limit) => tokio::time::timeout(limit, conversation.send(content))
                .await
                .unwrap_or(Err(GatewayError::Timeout)),
            None => conversation.send(content).await,
        };

        match result {
            Err(e) if e.is_transient() && attempt < params.max_retries => {
                let delay = params.backoff_for(attempt);
                attempt += 1;
                warn!(
                    model = %conversation.model(),
                    attempt,
                    max_retries = params.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Transient backend error, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}
