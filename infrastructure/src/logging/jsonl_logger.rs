//! JSONL transcript of review rounds.
//!
//! Every [`ConversationEvent`] the engine emits (`draft_response`,
//! `validator_result`, `validator_failed`, `revision`) becomes one JSON line
//! carrying the event payload plus `type` and `timestamp` fields. The file is
//! opened in append mode, so restarts extend the same transcript.

use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use verdict_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};

/// Conversation logger that appends one JSON object per line.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ConversationEvent) -> Value {
        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::from(event.event_type));
        map.insert(
            "timestamp".to_string(),
            Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            // One complete line per event even if the process dies afterwards
            let _ = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use verdict_application::{Session, ValidatorBinding};
    use verdict_application::ports::llm_gateway::{GatewayError, LlmSession};
    use verdict_domain::{Model, ReviewDecision, SessionKey};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::new(
            "draft_response",
            json!({"session": "abc_expert", "response": "draft"}),
        ));
        logger.log(ConversationEvent::new("revision", json!("plain text")));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "draft_response");
        assert_eq!(lines[0]["session"], "abc_expert");
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["type"], "revision");
        assert_eq!(lines[1]["data"], "plain text");
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("transcript.jsonl");

        for i in 0..2 {
            let logger = JsonlConversationLogger::open(&path).unwrap();
            logger.log(ConversationEvent::new("draft_response", json!({"round": i})));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["round"], 1);
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlConversationLogger::open(blocker.join("transcript.jsonl")).is_err());
    }

    struct Fixed(Model, &'static str);

    #[async_trait::async_trait]
    impl LlmSession for Fixed {
        fn model(&self) -> &Model {
            &self.0
        }

        async fn send(&self, _content: &str) -> Result<String, GatewayError> {
            Ok(self.1.to_string())
        }
    }

    #[tokio::test]
    async fn test_records_a_review_round() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.jsonl");
        let logger = Arc::new(JsonlConversationLogger::open(&path).unwrap());

        let expert = Session::new(
            SessionKey::new("abc_expert").unwrap(),
            Box::new(Fixed(Model::default(), "answer")),
        )
        .with_logger(logger.clone());
        let judge = Arc::new(Session::new(
            SessionKey::new("abc_judge").unwrap(),
            Box::new(Fixed(Model::default(), "fine")),
        ));
        expert
            .register_validator(ValidatorBinding::new(
                "judge",
                judge,
                |_: &str, _: &str, _: &str| ReviewDecision::accept(json!({"ok": true})),
            ))
            .unwrap();

        expert.send("question").await.unwrap();

        let types: Vec<String> = read_lines(&path)
            .iter()
            .map(|line| line["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(types, vec!["draft_response", "validator_result"]);
    }
}
