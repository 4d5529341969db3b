//! Prompt templates for the review flow

use crate::review::verdict::JudgeVerdict;

/// Placeholder replaced by the user's original message
pub const MESSAGE_PLACEHOLDER: &str = "{message}";
/// Placeholder replaced by the draft answer under review
pub const RESPONSE_PLACEHOLDER: &str = "{response}";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System instructions for the answering session
    pub fn expert_system() -> &'static str {
        r#"You are a knowledgeable expert answering questions for a curious user.
Give accurate, well-structured answers. Explain technical terms when you introduce them.
When you receive reviewer feedback about a previous answer, apply it and reply with the improved answer only."#
    }

    /// System instructions for the reviewing session
    pub fn judge_system() -> &'static str {
        r#"You are a strict academic reviewer evaluating answers written by another assistant.
Judge accuracy, completeness and clarity. Respond ONLY with a JSON object of this exact shape:

{"verdict": "APPROVED" | "REVISE" | "REJECTED", "score": <number from 1 to 10>, "overall_feedback": "<string>", "recommended_changes": "<string>"}

Use APPROVED when the answer is correct and complete, REVISE when it is mostly right but needs changes,
and REJECTED when it is wrong or off-topic. Do not add any text outside the JSON object."#
    }

    /// Default prompt sent to a validating session
    pub fn default_validator_prompt() -> &'static str {
        r#"Evaluate this AI response to the user's question:

USER QUESTION: {message}
AI RESPONSE: {response}

Provide specific, constructive feedback and a quality score according to the structure you were instructed to.
"#
    }

    /// Fill `{message}` and `{response}` in a validator prompt template.
    ///
    /// Substitution is single-pass: placeholder text inside the inserted
    /// values is left alone.
    pub fn format_validator_prompt(template: &str, message: &str, response: &str) -> String {
        let mut out = String::with_capacity(template.len() + message.len() + response.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix(MESSAGE_PLACEHOLDER) {
                out.push_str(message);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(RESPONSE_PLACEHOLDER) {
                out.push_str(response);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);

        out
    }

    /// Revision request for a `REVISE` verdict
    pub fn revise_instruction(verdict: &JudgeVerdict) -> String {
        format!(
            r#"A reviewer scored your previous answer {}/10 and asked for a revision.
Feedback: {}
Recommended changes: {}
Please revise your answer accordingly, maintaining core content."#,
            verdict.score, verdict.overall_feedback, verdict.recommended_changes
        )
    }

    /// Replacement request for a `REJECTED` verdict
    pub fn reject_instruction(verdict: &JudgeVerdict, message: &str) -> String {
        format!(
            r#"A reviewer rejected your previous answer with a score of {}/10.
Feedback: {}
Recommended changes: {}
Discard your previous answer and write a completely new response to the original question:
{}"#,
            verdict.score, verdict.overall_feedback, verdict.recommended_changes, message
        )
    }

    /// Corrective prompt merging every reviewer's instruction
    pub fn correction_prompt(instructions: &[String]) -> String {
        format!(
            "Multiple reviewers have provided feedback:\n\n{}\n\nPlease revise your previous answer accordingly.",
            instructions.join("\n\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::verdict::Verdict;

    #[test]
    fn test_format_validator_prompt() {
        let prompt = PromptTemplate::format_validator_prompt(
            PromptTemplate::default_validator_prompt(),
            "What is superposition?",
            "It's like a coin spinning.",
        );
        assert!(prompt.contains("USER QUESTION: What is superposition?"));
        assert!(prompt.contains("AI RESPONSE: It's like a coin spinning."));
        assert!(!prompt.contains("{message}"));
        assert!(!prompt.contains("{response}"));
    }

    #[test]
    fn test_format_is_single_pass() {
        let prompt = PromptTemplate::format_validator_prompt(
            "Q={message} A={response}",
            "explain {response}",
            "{message}",
        );
        assert_eq!(prompt, "Q=explain {response} A={message}");
    }

    #[test]
    fn test_format_keeps_other_braces() {
        let prompt =
            PromptTemplate::format_validator_prompt(r#"{"q": "{message}"} {x}"#, "hi", "unused");
        assert_eq!(prompt, r#"{"q": "hi"} {x}"#);
    }

    #[test]
    fn test_revise_instruction_contents() {
        let verdict = JudgeVerdict::new(Verdict::Revise, 4.0, "Oversimplified", "Add formalism");
        let text = PromptTemplate::revise_instruction(&verdict);
        assert!(text.contains("4/10"));
        assert!(text.contains("Oversimplified"));
        assert!(text.contains("Add formalism"));
        assert!(text.contains("maintaining core content"));
    }

    #[test]
    fn test_reject_instruction_includes_original_message() {
        let verdict = JudgeVerdict::new(Verdict::Rejected, 1.0, "Wrong topic", "Answer the question");
        let text = PromptTemplate::reject_instruction(&verdict, "What is superposition?");
        assert!(text.contains("Wrong topic"));
        assert!(text.contains("completely new response"));
        assert!(text.ends_with("What is superposition?"));
    }

    #[test]
    fn test_correction_prompt_joins_all_instructions() {
        let prompt =
            PromptTemplate::correction_prompt(&["first".to_string(), "second".to_string()]);
        assert!(prompt.starts_with("Multiple reviewers have provided feedback:"));
        assert!(prompt.contains("first\n\nsecond"));
        assert!(prompt.ends_with("Please revise your previous answer accordingly."));
    }
}
