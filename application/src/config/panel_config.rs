//! Expert/judge panel configuration.
//!
//! [`PanelConfig`] holds the prompts used by
//! [`AskExpertUseCase`](crate::use_cases::ask_expert::AskExpertUseCase)
//! when it pairs an expert session with its judge.

use serde::{Deserialize, Serialize};
use verdict_domain::PromptTemplate;

/// Validator id under which the judge's verdict is reported
pub const DEFAULT_JUDGE_ID: &str = "academic_judge";

/// Prompts and identifiers for one expert/judge pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// System instructions of the expert session
    pub expert_instructions: String,
    /// System instructions of the judge session
    pub judge_instructions: String,
    /// Prompt sent to the judge, with `{message}` and `{response}` placeholders
    pub validator_prompt: String,
    /// Validator id of the judge binding
    pub judge_id: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            expert_instructions: PromptTemplate::expert_system().to_string(),
            judge_instructions: PromptTemplate::judge_system().to_string(),
            validator_prompt: PromptTemplate::default_validator_prompt().to_string(),
            judge_id: DEFAULT_JUDGE_ID.to_string(),
        }
    }
}

impl PanelConfig {
    pub fn with_expert_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.expert_instructions = instructions.into();
        self
    }

    pub fn with_judge_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.judge_instructions = instructions.into();
        self
    }

    pub fn with_validator_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.validator_prompt = prompt.into();
        self
    }

    pub fn with_judge_id(mut self, id: impl Into<String>) -> Self {
        self.judge_id = id.into();
        self
    }
}
