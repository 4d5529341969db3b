//! Scripted backend doubles shared by the engine and use-case tests.

use crate::config::SessionParams;
use crate::engine::Session;
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use verdict_domain::{Model, SessionKey};

pub(crate) type Reply = Arc<dyn Fn(&str) -> Result<String, GatewayError> + Send + Sync>;
pub(crate) type PromptLog = Arc<Mutex<Vec<String>>>;

/// Conversation whose answers come from a closure; records every prompt.
pub(crate) struct MockConversation {
    model: Model,
    reply: Reply,
    prompts: PromptLog,
    delay: Option<Duration>,
}

impl MockConversation {
    pub(crate) fn replying(
        reply: impl Fn(&str) -> Result<String, GatewayError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            model: Model::default(),
            reply: Arc::new(reply),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Answers in order; fails once the script is exhausted.
    pub(crate) fn scripted(responses: &[&str]) -> Self {
        let queue: Mutex<VecDeque<String>> =
            Mutex::new(responses.iter().map(|r| r.to_string()).collect());
        Self::replying(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| GatewayError::Other("No more responses".to_string()))
        })
    }

    pub(crate) fn failing(error: GatewayError) -> Self {
        Self::replying(move |_| Err(error.clone()))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn prompts(&self) -> PromptLog {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl LlmSession for MockConversation {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(content.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.reply)(content)
    }
}

/// Session parameters without retries or timeouts
pub(crate) fn fast_params() -> SessionParams {
    SessionParams::default()
        .with_max_retries(0)
        .with_send_timeout(None)
}

/// Build a standalone session around `conversation` with [`fast_params`].
pub(crate) fn session(key: &str, conversation: MockConversation) -> (Arc<Session>, PromptLog) {
    session_with_params(key, conversation, fast_params())
}

pub(crate) fn session_with_params(
    key: &str,
    conversation: MockConversation,
    params: SessionParams,
) -> (Arc<Session>, PromptLog) {
    let prompts = conversation.prompts();
    let session = Session::new(SessionKey::new(key).unwrap(), Box::new(conversation))
        .with_params(params);
    (Arc::new(session), prompts)
}

type Factory = Box<dyn Fn(Option<&str>) -> MockConversation + Send + Sync>;

/// Gateway that builds conversations from a factory and counts creations.
pub(crate) struct MockGateway {
    factory: Factory,
    created: AtomicUsize,
    system_prompts: Mutex<Vec<Option<String>>>,
    create_delay: Option<Duration>,
    failures_left: AtomicUsize,
}

impl MockGateway {
    pub(crate) fn new(
        factory: impl Fn(Option<&str>) -> MockConversation + Send + Sync + 'static,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            created: AtomicUsize::new(0),
            system_prompts: Mutex::new(Vec::new()),
            create_delay: None,
            failures_left: AtomicUsize::new(0),
        }
    }

    /// Gateway whose conversations echo the prompt back.
    pub(crate) fn echo() -> Self {
        Self::new(|_| MockConversation::replying(|prompt| Ok(format!("echo: {}", prompt))))
    }

    pub(crate) fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Fail the next `times` creations with a connection error.
    pub(crate) fn failing_creation(self, times: usize) -> Self {
        self.failures_left.store(times, Ordering::SeqCst);
        self
    }

    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn system_prompts(&self) -> Vec<Option<String>> {
        self.system_prompts.lock().unwrap().clone()
    }

    async fn build(&self, system_prompt: Option<&str>) -> Result<Box<dyn LlmSession>, GatewayError> {
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(GatewayError::ConnectionError("backend down".to_string()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        self.system_prompts
            .lock()
            .unwrap()
            .push(system_prompt.map(str::to_string));
        Ok(Box::new((self.factory)(system_prompt)))
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn create_session(&self, _model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.build(None).await
    }

    async fn create_session_with_system_prompt(
        &self,
        _model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.build(Some(system_prompt)).await
    }
}
