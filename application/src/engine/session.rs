//! Reviewed conversation sessions
//!
//! A [`Session`] owns one conversation handle and the reviewers attached to
//! it. [`Session::send`] runs the whole exchange:
//!
//! ```text
//! message ──► conversation ──► draft
//!                                │  (no validators → return draft)
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!       validator A         validator B   ...   validator N   (one task each)
//!            └───────────────────┼───────────────────┘
//!                          barrier join
//!                                │  (no revision instruction → return draft)
//!                                ▼
//!          correction prompt ──► conversation ──► final response
//! ```
//!
//! The corrected answer is not validated again, so a send performs at most
//! two calls on its own conversation.

use super::binding::ValidatorBinding;
use super::error::{RegistrationError, SessionError};
use super::retry::send_with_retry;
use crate::config::SessionParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LlmSession;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use verdict_domain::core::string::truncate;
use verdict_domain::{Model, PromptTemplate, SessionKey};

/// Held across the reachability check and the insertion of a registration
static REGISTRATION: Mutex<()> = Mutex::new(());

/// Result of one [`Session::send`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendOutcome {
    /// Final answer: the draft, or the corrected answer if a reviewer asked for one
    pub response: String,
    /// Payload of every validator that completed, keyed by validator id
    pub payloads: HashMap<String, Value>,
    /// Whether a correction round replaced the draft
    pub revised: bool,
    /// Validators whose review failed and was skipped
    pub failed_validators: Vec<String>,
}

impl SendOutcome {
    fn unreviewed(response: String) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    pub fn payload(&self, validator_id: &str) -> Option<&Value> {
        self.payloads.get(validator_id)
    }
}

/// Results gathered from one fan-out
struct ReviewRound {
    payloads: HashMap<String, Value>,
    instructions: Vec<String>,
    failed: Vec<String>,
}

impl ReviewRound {
    fn with_capacity(validators: usize) -> Self {
        Self {
            payloads: HashMap::with_capacity(validators),
            instructions: Vec::with_capacity(validators),
            failed: Vec::new(),
        }
    }
}

/// One conversation with the backend plus the reviewers attached to it
pub struct Session {
    key: SessionKey,
    instructions: Option<String>,
    conversation: Box<dyn LlmSession>,
    validators: Mutex<Vec<ValidatorBinding>>,
    params: SessionParams,
    logger: Arc<dyn ConversationLogger>,
}

impl Session {
    pub fn new(key: SessionKey, conversation: Box<dyn LlmSession>) -> Self {
        Self {
            key,
            instructions: None,
            conversation,
            validators: Mutex::new(Vec::new()),
            params: SessionParams::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Record the system instructions the conversation was created with
    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn model(&self) -> &Model {
        self.conversation.model()
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    // ==================== Validators ====================

    fn lock_validators(&self) -> MutexGuard<'_, Vec<ValidatorBinding>> {
        self.validators.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the attached validators, in registration order
    pub fn validators(&self) -> Vec<ValidatorBinding> {
        self.lock_validators().clone()
    }

    pub fn validator_count(&self) -> usize {
        self.lock_validators().len()
    }

    pub fn validator_ids(&self) -> Vec<String> {
        self.lock_validators()
            .iter()
            .map(|b| b.id().to_string())
            .collect()
    }

    /// Attach a reviewer.
    ///
    /// Returns `Ok(true)` when the binding was added and `Ok(false)` when it
    /// was ignored because a binding with the same id or the same reviewing
    /// session already exists. Bindings that would let this session end up
    /// reviewing itself are rejected, including when two sessions register
    /// each other concurrently.
    pub fn register_validator(&self, binding: ValidatorBinding) -> Result<bool, RegistrationError> {
        if binding.id().trim().is_empty() {
            return Err(RegistrationError::EmptyId);
        }

        // Lock order: this guard, then validator locks
        let _registration = REGISTRATION.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_reachable_from(binding.session()) {
            return Err(RegistrationError::Cycle {
                validator: binding.id().to_string(),
                session: self.key.to_string(),
            });
        }

        let mut validators = self.lock_validators();
        if validators.iter().any(|existing| existing.conflicts_with(&binding)) {
            debug!(
                session = %self.key,
                validator = binding.id(),
                "Validator already registered, ignoring"
            );
            return Ok(false);
        }

        info!(
            session = %self.key,
            validator = binding.id(),
            reviewer = %binding.session().key(),
            "Validator registered"
        );
        validators.push(binding);
        Ok(true)
    }

    /// Whether this session can be reached from `start` by following
    /// validator bindings (including `start` itself).
    fn is_reachable_from(&self, start: &Arc<Session>) -> bool {
        let target: *const Session = self;
        let mut stack = vec![Arc::clone(start)];
        let mut visited: HashSet<*const Session> = HashSet::new();

        while let Some(node) = stack.pop() {
            let ptr = Arc::as_ptr(&node);
            if ptr == target {
                return true;
            }
            if !visited.insert(ptr) {
                continue;
            }
            stack.extend(
                node.validators()
                    .into_iter()
                    .map(|binding| Arc::clone(binding.session())),
            );
        }

        false
    }

    // ==================== Send ====================

    /// Send `message`, run every validator on the draft, and apply their
    /// revision instructions in a single correction round.
    ///
    /// Fails only when this session's own backend calls fail; a failing
    /// validator is skipped and listed in [`SendOutcome::failed_validators`].
    /// Dropping the returned future aborts the validator tasks in flight.
    pub async fn send(&self, message: &str) -> Result<SendOutcome, SessionError> {
        self.send_at_depth(message, 0).await
    }

    fn send_at_depth<'a>(
        &'a self,
        message: &'a str,
        depth: usize,
    ) -> BoxFuture<'a, Result<SendOutcome, SessionError>> {
        async move {
            let draft = self.call_backend(message).await?;
            debug!(
                session = %self.key,
                depth,
                draft = %truncate(&draft, 120),
                "Draft response received"
            );
            self.logger.log(ConversationEvent::new(
                "draft_response",
                json!({
                    "session": self.key.as_str(),
                    "depth": depth,
                    "message": message,
                    "response": draft,
                }),
            ));

            let bindings = self.validators();
            if bindings.is_empty() {
                return Ok(SendOutcome::unreviewed(draft));
            }
            if depth >= self.params.max_validation_depth {
                warn!(
                    session = %self.key,
                    depth,
                    max_depth = self.params.max_validation_depth,
                    "Validation depth limit reached, returning unreviewed draft"
                );
                return Ok(SendOutcome::unreviewed(draft));
            }

            info!(
                session = %self.key,
                validators = bindings.len(),
                depth,
                "Running validators"
            );
            let round = self.review(bindings, message, &draft, depth).await;

            if round.instructions.is_empty() {
                return Ok(SendOutcome {
                    response: draft,
                    payloads: round.payloads,
                    revised: false,
                    failed_validators: round.failed,
                });
            }

            info!(
                session = %self.key,
                instructions = round.instructions.len(),
                "Reviewers requested a revision"
            );
            let correction = PromptTemplate::correction_prompt(&round.instructions);
            let revised = self.call_backend(&correction).await?;
            self.logger.log(ConversationEvent::new(
                "revision",
                json!({
                    "session": self.key.as_str(),
                    "depth": depth,
                    "prompt": correction,
                    "response": revised,
                }),
            ));

            Ok(SendOutcome {
                response: revised,
                payloads: round.payloads,
                revised: true,
                failed_validators: round.failed,
            })
        }
        .boxed()
    }

    /// Fan out one task per binding and wait for all of them.
    async fn review(
        &self,
        bindings: Vec<ValidatorBinding>,
        message: &str,
        draft: &str,
        depth: usize,
    ) -> ReviewRound {
        let mut round = ReviewRound::with_capacity(bindings.len());
        let mut pending: HashSet<String> = bindings.iter().map(|b| b.id().to_string()).collect();
        let message: Arc<str> = Arc::from(message);
        let draft: Arc<str> = Arc::from(draft);

        let mut join_set = JoinSet::new();
        for binding in bindings {
            let message = Arc::clone(&message);
            let draft = Arc::clone(&draft);

            join_set.spawn(async move {
                let prompt = binding.render_prompt(&message, &draft);
                let result = binding.session().send_at_depth(&prompt, depth + 1).await;
                let decision = result.map(|outcome| {
                    binding
                        .decision()
                        .decide(&outcome.response, &draft, &message)
                });
                (binding.id().to_string(), decision)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, Ok(decision))) => {
                    pending.remove(&id);
                    let instruction = decision.instruction().map(str::to_string);
                    debug!(
                        session = %self.key,
                        validator = %id,
                        revision = instruction.is_some(),
                        "Validator completed"
                    );
                    self.logger.log(ConversationEvent::new(
                        "validator_result",
                        json!({
                            "session": self.key.as_str(),
                            "validator": id,
                            "revision": instruction,
                            "payload": decision.payload,
                        }),
                    ));
                    if let Some(instruction) = instruction {
                        round.instructions.push(instruction);
                    }
                    round.payloads.insert(id, decision.payload);
                }
                Ok((id, Err(e))) => {
                    pending.remove(&id);
                    warn!(
                        session = %self.key,
                        validator = %id,
                        "Validator failed, continuing without it: {}",
                        e
                    );
                    self.logger.log(ConversationEvent::new(
                        "validator_failed",
                        json!({
                            "session": self.key.as_str(),
                            "validator": id,
                            "error": e.to_string(),
                        }),
                    ));
                    round.failed.push(id);
                }
                Err(e) => {
                    warn!(session = %self.key, "Validator task join error: {}", e);
                }
            }
        }

        // Tasks that panicked never reported their id
        round.failed.extend(pending);
        round
    }

    async fn call_backend(&self, content: &str) -> Result<String, SessionError> {
        send_with_retry(self.conversation.as_ref(), content, &self.params)
            .await
            .map_err(|e| SessionError::backend(self.key.as_str(), e))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("model", self.model())
            .field("instructions", &self.instructions)
            .field("validators", &self.validator_ids())
            .finish()
    }
}
