//! Validator bindings
//!
//! A [`ValidatorBinding`] links a reviewing [`Session`] and a decision
//! function to the session being validated. Bindings are immutable; a
//! session's fan-out works on a snapshot of them.

use super::session::Session;
use std::fmt;
use std::sync::Arc;
use verdict_domain::{PromptTemplate, ValidatorDecision};

/// One reviewer attached to a validated session
#[derive(Clone)]
pub struct ValidatorBinding {
    id: String,
    session: Arc<Session>,
    prompt_template: Arc<str>,
    decision: Arc<dyn ValidatorDecision>,
}

impl ValidatorBinding {
    /// Bind `session` as reviewer `id`, using the default validator prompt.
    pub fn new(
        id: impl Into<String>,
        session: Arc<Session>,
        decision: impl ValidatorDecision + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            session,
            prompt_template: Arc::from(PromptTemplate::default_validator_prompt()),
            decision: Arc::new(decision),
        }
    }

    /// Replace the prompt template (`{message}` and `{response}` are substituted).
    pub fn with_prompt(mut self, template: impl AsRef<str>) -> Self {
        self.prompt_template = Arc::from(template.as_ref());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The session that runs the validation prompt
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn decision(&self) -> &dyn ValidatorDecision {
        self.decision.as_ref()
    }

    /// Prompt sent to the validating session for one exchange
    pub fn render_prompt(&self, message: &str, draft: &str) -> String {
        PromptTemplate::format_validator_prompt(&self.prompt_template, message, draft)
    }

    /// Whether this binding and `other` would review through the same session
    pub(crate) fn conflicts_with(&self, other: &ValidatorBinding) -> bool {
        self.id == other.id || Arc::ptr_eq(&self.session, &other.session)
    }
}

impl fmt::Debug for ValidatorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBinding")
            .field("id", &self.id)
            .field("session", &self.session.key())
            .field("prompt_template", &self.prompt_template)
            .finish_non_exhaustive()
    }
}
