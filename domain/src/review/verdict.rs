//! Judge verdict types
//!
//! The structured answer a judge session is instructed to produce.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome a judge assigns to a draft answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// The draft is good as is
    Approved,
    /// The draft should be revised, keeping its core content
    Revise,
    /// The draft should be replaced by a new answer
    Rejected,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "APPROVED",
            Verdict::Revise => "REVISE",
            Verdict::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Ok(Verdict::Approved),
            "REVISE" => Ok(Verdict::Revise),
            "REJECTED" => Ok(Verdict::Rejected),
            other => Err(format!("unknown verdict '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parsed judge response
///
/// # Example
///
/// ```
/// use verdict_domain::{JudgeVerdict, Verdict};
///
/// let verdict = JudgeVerdict::fallback();
/// assert_eq!(verdict.verdict, Verdict::Approved);
/// assert_eq!(verdict.score, 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub verdict: Verdict,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: f64,
    pub overall_feedback: String,
    pub recommended_changes: String,
}

impl JudgeVerdict {
    /// Feedback text carried by [`JudgeVerdict::fallback`]
    pub const PARSE_FAILED_FEEDBACK: &'static str = "Judge response parsing failed";

    pub fn new(
        verdict: Verdict,
        score: f64,
        overall_feedback: impl Into<String>,
        recommended_changes: impl Into<String>,
    ) -> Self {
        Self {
            verdict,
            score,
            overall_feedback: overall_feedback.into(),
            recommended_changes: recommended_changes.into(),
        }
    }

    /// Verdict substituted when the judge's text cannot be decoded
    pub fn fallback() -> Self {
        Self::new(
            Verdict::Approved,
            5.0,
            Self::PARSE_FAILED_FEEDBACK,
            "None",
        )
    }

    pub fn is_approved(&self) -> bool {
        self.verdict == Verdict::Approved
    }
}

/// Scores arrive as JSON numbers, but some models quote them.
fn deserialize_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(f64),
        Text(String),
    }

    match RawScore::deserialize(deserializer)? {
        RawScore::Number(n) => Ok(n),
        RawScore::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid score '{}'", s))),
    }
}
