//! Ask Expert use case
//!
//! Pairs an `expert` session with a `judge` session for one external
//! conversation id, binds the judge as the expert's validator and sends the
//! user's message through the expert.

use crate::config::PanelConfig;
use crate::engine::{RegistrationError, SessionError, SessionRegistry, ValidatorBinding};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use verdict_domain::{DomainError, JudgeDecision, JudgeVerdict, SessionKey, SessionRole};

/// Errors that can occur while asking the expert
#[derive(Error, Debug)]
pub enum AskExpertError {
    #[error(transparent)]
    InvalidInput(#[from] DomainError),

    #[error("Failed to open session: {0}")]
    SessionUnavailable(#[from] GatewayError),

    #[error("Failed to attach judge: {0}")]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Send(#[from] SessionError),
}

impl AskExpertError {
    /// Whether the caller sent an unusable request (as opposed to a backend failure)
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AskExpertError::InvalidInput(_))
    }
}

/// Input for the AskExpert use case
#[derive(Debug, Clone)]
pub struct AskExpertInput {
    /// External conversation id (cookie value, CLI `--session`)
    pub session_id: String,
    /// The user's message
    pub message: String,
}

impl AskExpertInput {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
        }
    }
}

/// Result of one expert exchange
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskExpertOutput {
    /// The expert's final answer
    pub message: String,
    /// The judge's verdict; `None` when the judge could not be reached
    pub judge_data: Option<JudgeVerdict>,
    /// Whether the judge's feedback produced a revised answer
    pub revised: bool,
}

/// Use case for one reviewed expert exchange
pub struct AskExpertUseCase<G: LlmGateway + 'static> {
    registry: Arc<SessionRegistry<G>>,
    panel: PanelConfig,
}

impl<G: LlmGateway + 'static> AskExpertUseCase<G> {
    pub fn new(registry: Arc<SessionRegistry<G>>, panel: PanelConfig) -> Self {
        Self { registry, panel }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry<G>> {
        &self.registry
    }

    pub fn panel(&self) -> &PanelConfig {
        &self.panel
    }

    pub async fn execute(&self, input: AskExpertInput) -> Result<AskExpertOutput, AskExpertError> {
        if input.message.trim().is_empty() {
            return Err(DomainError::InvalidMessage("message must not be empty".to_string()).into());
        }
        let expert_key = SessionKey::for_role(&input.session_id, &SessionRole::Expert)?;
        let judge_key = SessionKey::for_role(&input.session_id, &SessionRole::Judge)?;

        let expert = self
            .registry
            .get_or_create(&expert_key, Some(self.panel.expert_instructions.as_str()))
            .await?;
        let judge = self
            .registry
            .get_or_create(&judge_key, Some(self.panel.judge_instructions.as_str()))
            .await?;

        // Re-registration on later requests is a no-op
        let binding = ValidatorBinding::new(self.panel.judge_id.as_str(), judge, JudgeDecision)
            .with_prompt(&self.panel.validator_prompt);
        if expert.register_validator(binding)? {
            debug!(session = %expert_key, judge = %judge_key, "Judge attached");
        }

        info!(session = %input.session_id, "Asking expert");
        let outcome = expert.send(&input.message).await?;

        let judge_data = outcome
            .payload(&self.panel.judge_id)
            .and_then(|payload| serde_json::from_value::<JudgeVerdict>(payload.clone()).ok());
        if judge_data.is_none() {
            warn!(session = %input.session_id, "No judge verdict for this exchange");
        }

        Ok(AskExpertOutput {
            message: outcome.response,
            judge_data,
            revised: outcome.revised,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockConversation, MockGateway, fast_params};
    use verdict_domain::{Model, PromptTemplate, Verdict};

    const REVISE: &str = r#"```json
{"verdict": "REVISE", "score": 4, "overall_feedback": "Oversimplified", "recommended_changes": "Add formalism"}
```"#;
    const APPROVED: &str =
        r#"{"verdict":"APPROVED","score":9,"overall_feedback":"Good","recommended_changes":"None"}"#;

    /// Gateway whose expert answers in order from `expert` and whose judge
    /// always replies with `judge`.
    fn panel_gateway(expert: &'static [&'static str], judge: &'static str) -> MockGateway {
        MockGateway::new(move |system_prompt| {
            if system_prompt == Some(PromptTemplate::judge_system()) {
                MockConversation::replying(move |_| Ok(judge.to_string()))
            } else {
                MockConversation::scripted(expert)
            }
        })
    }

    fn use_case(gateway: MockGateway) -> (AskExpertUseCase<MockGateway>, Arc<MockGateway>) {
        let gateway = Arc::new(gateway);
        let registry = Arc::new(
            SessionRegistry::new(Arc::clone(&gateway), Model::default()).with_params(fast_params()),
        );
        (AskExpertUseCase::new(registry, PanelConfig::default()), gateway)
    }

    #[tokio::test]
    async fn test_revise_verdict_returns_revised_answer() {
        let (use_case, _) = use_case(panel_gateway(
            &["It is in two states at once.", "Formal answer."],
            REVISE,
        ));

        let output = use_case
            .execute(AskExpertInput::new("abc", "What is superposition?"))
            .await
            .unwrap();

        assert_eq!(output.message, "Formal answer.");
        assert!(output.revised);
        let verdict = output.judge_data.unwrap();
        assert_eq!(verdict.verdict, Verdict::Revise);
        assert_eq!(verdict.score, 4.0);
        assert_eq!(verdict.overall_feedback, "Oversimplified");
    }

    #[tokio::test]
    async fn test_sessions_are_keyed_by_role() {
        let (use_case, gateway) = use_case(panel_gateway(&["answer"], APPROVED));

        use_case
            .execute(AskExpertInput::new("abc", "question"))
            .await
            .unwrap();

        let registry = use_case.registry();
        assert!(registry.contains(&SessionKey::new("abc_expert").unwrap()));
        assert!(registry.contains(&SessionKey::new("abc_judge").unwrap()));
        assert_eq!(gateway.created(), 2);
        assert_eq!(
            gateway.system_prompts(),
            vec![
                Some(PromptTemplate::expert_system().to_string()),
                Some(PromptTemplate::judge_system().to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_requests_keep_one_judge() {
        let (use_case, gateway) = use_case(panel_gateway(&["one", "two", "three"], APPROVED));

        for message in ["first", "second", "third"] {
            let output = use_case
                .execute(AskExpertInput::new("abc", message))
                .await
                .unwrap();
            assert!(output.judge_data.unwrap().is_approved());
        }

        let expert = use_case
            .registry()
            .get(&SessionKey::new("abc_expert").unwrap())
            .unwrap();
        assert_eq!(expert.validator_count(), 1);
        assert_eq!(expert.validator_ids(), vec!["academic_judge".to_string()]);
        assert_eq!(gateway.created(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_judge_falls_back_to_approval() {
        let (use_case, _) = use_case(panel_gateway(&["answer"], "I think it is fine."));

        let output = use_case
            .execute(AskExpertInput::new("abc", "question"))
            .await
            .unwrap();

        assert_eq!(output.message, "answer");
        assert!(!output.revised);
        assert_eq!(output.judge_data, Some(JudgeVerdict::fallback()));
    }

    #[tokio::test]
    async fn test_unreachable_judge_leaves_answer_unreviewed() {
        let gateway = MockGateway::new(|system_prompt| {
            if system_prompt == Some(PromptTemplate::judge_system()) {
                MockConversation::failing(GatewayError::RequestFailed("quota".to_string()))
            } else {
                MockConversation::scripted(&["answer"])
            }
        });
        let (use_case, _) = use_case(gateway);

        let output = use_case
            .execute(AskExpertInput::new("abc", "question"))
            .await
            .unwrap();

        assert_eq!(output.message, "answer");
        assert!(output.judge_data.is_none());
    }

    #[tokio::test]
    async fn test_empty_message_is_invalid_input() {
        let (use_case, gateway) = use_case(panel_gateway(&[], APPROVED));

        let err = use_case
            .execute(AskExpertInput::new("abc", "   "))
            .await
            .unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(gateway.created(), 0);
    }

    #[tokio::test]
    async fn test_empty_session_id_is_invalid_input() {
        let (use_case, _) = use_case(panel_gateway(&[], APPROVED));

        let err = use_case
            .execute(AskExpertInput::new("", "question"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AskExpertError::InvalidInput(DomainError::InvalidSessionKey(_))
        ));
    }

    #[tokio::test]
    async fn test_expert_failure_is_reported() {
        let (use_case, _) = use_case(MockGateway::new(|_| {
            MockConversation::failing(GatewayError::Unavailable("503".to_string()))
        }));

        let err = use_case
            .execute(AskExpertInput::new("abc", "question"))
            .await
            .unwrap_err();

        assert!(matches!(err, AskExpertError::Send(_)));
        assert!(!err.is_invalid_input());
    }
}
