//! Judge response parsing.
//!
//! Judges are asked for a JSON object, but models often wrap it in a fenced
//! code block. Parsing is pure: no I/O, no session state.

use super::verdict::JudgeVerdict;
use tracing::warn;

/// Remove surrounding whitespace and an optional fenced code block.
///
/// Accepts an opening fence with or without a language tag
/// (```` ```json ````, ```` ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Strictly decode a judge response.
pub fn try_parse_judge_response(raw: &str) -> Result<JudgeVerdict, serde_json::Error> {
    serde_json::from_str(strip_code_fence(raw))
}

/// Decode a judge response, substituting [`JudgeVerdict::fallback`] on failure.
///
/// Never fails; a decode failure is logged and otherwise swallowed.
pub fn parse_judge_response(raw: &str) -> JudgeVerdict {
    match try_parse_judge_response(raw) {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!(
                error = %e,
                raw = %crate::core::string::truncate(raw, 200),
                "Judge response could not be parsed, falling back to approval"
            );
            JudgeVerdict::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::verdict::Verdict;

    const PLAIN: &str = r#"{"verdict":"REVISE","score":4,"overall_feedback":"Oversimplified","recommended_changes":"Add formalism"}"#;

    #[test]
    fn test_parse_plain_json() {
        let verdict = parse_judge_response(PLAIN);
        assert_eq!(verdict.verdict, Verdict::Revise);
        assert_eq!(verdict.score, 4.0);
        assert_eq!(verdict.overall_feedback, "Oversimplified");
        assert_eq!(verdict.recommended_changes, "Add formalism");
    }

    #[test]
    fn test_fenced_json_matches_plain() {
        let fenced = format!("```json\n{}\n```", PLAIN);
        assert_eq!(parse_judge_response(&fenced), parse_judge_response(PLAIN));

        let untagged = format!("  ```\n{}\n```\n", PLAIN);
        assert_eq!(parse_judge_response(&untagged), parse_judge_response(PLAIN));
    }

    #[test]
    fn test_malformed_yields_fallback() {
        let verdict = parse_judge_response("The answer looks fine to me.");
        assert_eq!(verdict, JudgeVerdict::fallback());
        assert_eq!(verdict.verdict, Verdict::Approved);
        assert_eq!(verdict.score, 5.0);
        assert_eq!(verdict.overall_feedback, "Judge response parsing failed");
        assert_eq!(verdict.recommended_changes, "None");
    }

    #[test]
    fn test_missing_field_yields_fallback() {
        let verdict = parse_judge_response(r#"{"verdict":"REJECTED","score":2}"#);
        assert_eq!(verdict, JudgeVerdict::fallback());
    }

    #[test]
    fn test_unknown_verdict_yields_fallback() {
        let verdict = parse_judge_response(
            r#"{"verdict":"MAYBE","score":2,"overall_feedback":"x","recommended_changes":"y"}"#,
        );
        assert_eq!(verdict, JudgeVerdict::fallback());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
    }

    #[test]
    fn test_try_parse_reports_error() {
        assert!(try_parse_judge_response("not json").is_err());
    }
}
