//! Wire shape of a reviewed answer

use serde::Serialize;
use verdict_application::AskExpertOutput;
use verdict_domain::JudgeVerdict;

/// `{message, judge_data}` as returned by `POST /prompt` and `ask --output json`
#[derive(Debug, Serialize)]
pub struct PromptResponse<'a> {
    pub message: &'a str,
    pub judge_data: Option<&'a JudgeVerdict>,
}

impl<'a> From<&'a AskExpertOutput> for PromptResponse<'a> {
    fn from(output: &'a AskExpertOutput) -> Self {
        Self {
            message: &output.message,
            judge_data: output.judge_data.as_ref(),
        }
    }
}
