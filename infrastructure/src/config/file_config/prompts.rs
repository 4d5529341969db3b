//! Prompt configuration from TOML (`[prompts]` section)

use serde::{Deserialize, Serialize};
use verdict_application::PanelConfig;

/// Raw prompt overrides from TOML; unset fields keep the built-in prompts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    pub expert_instructions: Option<String>,
    pub judge_instructions: Option<String>,
    /// Must contain `{message}` and `{response}`
    pub validator_prompt: Option<String>,
    pub judge_id: Option<String>,
}

impl FilePromptsConfig {
    pub fn to_panel_config(&self) -> PanelConfig {
        let mut panel = PanelConfig::default();
        if let Some(text) = &self.expert_instructions {
            panel = panel.with_expert_instructions(text.as_str());
        }
        if let Some(text) = &self.judge_instructions {
            panel = panel.with_judge_instructions(text.as_str());
        }
        if let Some(text) = &self.validator_prompt {
            panel = panel.with_validator_prompt(text.as_str());
        }
        if let Some(id) = &self.judge_id {
            panel = panel.with_judge_id(id.as_str());
        }
        panel
    }
}
