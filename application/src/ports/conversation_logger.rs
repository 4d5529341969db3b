//! Transcript port
//!
//! Sessions report each step of an exchange here: the draft, every
//! reviewer's outcome and the correction round. Adapters decide where the
//! transcript goes; `tracing` output stays the place for diagnostics.

use serde_json::Value;

/// One step of a reviewed exchange
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// `draft_response`, `validator_result`, `validator_failed` or `revision`
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript events.
///
/// Called inline from the send path, so implementations must not block for
/// long and must swallow their own I/O errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event (the registry default)
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
