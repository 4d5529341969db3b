//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for a reviewed exchange printed on the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Final answer followed by the reviewer verdicts (default)
    #[default]
    Text,
    /// Only the final answer
    Answer,
    /// JSON output (`{message, judge_data}`)
    Json,
}
