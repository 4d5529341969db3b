//! Console output formatter for reviewed answers

use super::response::PromptResponse;
use colored::Colorize;
use verdict_application::AskExpertOutput;
use verdict_domain::{JudgeVerdict, OutputFormat, Verdict};

/// Formats expert answers for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `output` in the requested format
    pub fn render(output: &AskExpertOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format(output),
            OutputFormat::Answer => Self::format_answer(output),
            OutputFormat::Json => Self::format_json(output),
        }
    }

    /// Answer followed by the judge's verdict
    pub fn format(output: &AskExpertOutput) -> String {
        let mut text = String::new();

        let title = if output.revised {
            "Answer (revised after review)"
        } else {
            "Answer"
        };
        text.push_str(&Self::section_header(title));
        text.push_str(&format!("\n{}\n", output.message.trim()));

        text.push_str(&Self::section_header("Judge"));
        match &output.judge_data {
            Some(verdict) => text.push_str(&Self::format_verdict(verdict)),
            None => text.push_str(&format!(
                "\n{}\n",
                "No verdict: the judge could not be reached".red()
            )),
        }

        text
    }

    /// Only the final answer
    pub fn format_answer(output: &AskExpertOutput) -> String {
        format!("{}\n", output.message.trim())
    }

    /// `{message, judge_data}` as pretty JSON
    pub fn format_json(output: &AskExpertOutput) -> String {
        serde_json::to_string_pretty(&PromptResponse::from(output)).unwrap_or_else(|e| {
            format!(r#"{{"error": "Failed to serialize result: {}"}}"#, e)
        })
    }

    fn format_verdict(verdict: &JudgeVerdict) -> String {
        let label = match verdict.verdict {
            Verdict::Approved => verdict.verdict.as_str().green().bold(),
            Verdict::Revise => verdict.verdict.as_str().yellow().bold(),
            Verdict::Rejected => verdict.verdict.as_str().red().bold(),
        };

        format!(
            "\n{} {}  {} {}/10\n{} {}\n{} {}\n",
            "Verdict:".cyan().bold(),
            label,
            "Score:".cyan().bold(),
            verdict.score,
            "Feedback:".cyan().bold(),
            verdict.overall_feedback,
            "Changes:".cyan().bold(),
            verdict.recommended_changes
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).yellow().bold())
    }
}
