//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily rolling log files; console only when unset
    pub dir: Option<PathBuf>,
    /// JSONL transcript of every review round; disabled when unset
    pub conversation_log: Option<PathBuf>,
}
