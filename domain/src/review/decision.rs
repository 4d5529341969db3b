//! Validator decision functions
//!
//! A decision turns a validating session's raw answer into an optional
//! revision instruction plus an opaque payload that is reported back to the
//! caller under the validator's id.

use super::parsing::parse_judge_response;
use super::verdict::{JudgeVerdict, Verdict};
use crate::prompt::PromptTemplate;
use serde_json::Value;

/// Result of evaluating one validation response
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDecision {
    /// Text fed back to the validated conversation, if a correction is wanted
    pub revision: Option<String>,
    /// Opaque result reported to the caller
    pub payload: Value,
}

impl ReviewDecision {
    /// Decision that asks for no correction
    pub fn accept(payload: Value) -> Self {
        Self {
            revision: None,
            payload,
        }
    }

    /// Decision that asks for a correction
    pub fn revise(instruction: impl Into<String>, payload: Value) -> Self {
        Self {
            revision: Some(instruction.into()),
            payload,
        }
    }

    /// The revision instruction, if it carries any non-blank text
    pub fn instruction(&self) -> Option<&str> {
        self.revision
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Pure evaluation of a validation response
///
/// Implementations must not perform I/O; they only interpret text.
/// Closures with the matching signature implement this trait.
pub trait ValidatorDecision: Send + Sync {
    /// Evaluate `validation` (the reviewer's answer) for `draft`, the answer
    /// given to the user's `message`.
    fn decide(&self, validation: &str, draft: &str, message: &str) -> ReviewDecision;
}

impl<F> ValidatorDecision for F
where
    F: Fn(&str, &str, &str) -> ReviewDecision + Send + Sync,
{
    fn decide(&self, validation: &str, draft: &str, message: &str) -> ReviewDecision {
        self(validation, draft, message)
    }
}

/// Decision for judges that answer with a [`JudgeVerdict`] JSON object
///
/// - `APPROVED` → no revision
/// - `REVISE` → revision keeping the core content
/// - `REJECTED` → request for a new answer to the original message
///
/// Undecodable answers become [`JudgeVerdict::fallback`] and never ask for a revision.
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgeDecision;

impl JudgeDecision {
    /// Map an already parsed verdict to a decision
    pub fn from_verdict(verdict: JudgeVerdict, message: &str) -> ReviewDecision {
        let revision = match verdict.verdict {
            Verdict::Approved => None,
            Verdict::Revise => Some(PromptTemplate::revise_instruction(&verdict)),
            Verdict::Rejected => Some(PromptTemplate::reject_instruction(&verdict, message)),
        };
        let payload = serde_json::to_value(&verdict).unwrap_or_default();

        ReviewDecision { revision, payload }
    }
}

impl ValidatorDecision for JudgeDecision {
    fn decide(&self, validation: &str, _draft: &str, message: &str) -> ReviewDecision {
        Self::from_verdict(parse_judge_response(validation), message)
    }
}
