//! Session registry
//!
//! The registry is the only way to obtain a [`Session`]. It owns every live
//! session, keyed by [`SessionKey`], and evicts idle ones lazily: each lookup
//! first sweeps entries whose last access is older than the configured TTL.
//!
//! The key map is guarded by a mutex that is never held across a backend
//! call. Creation of a missing session happens through a per-key
//! [`OnceCell`], so concurrent lookups of the same new key share one
//! creation while lookups of other keys proceed independently.

use super::session::Session;
use crate::config::SessionParams;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{debug, info};
use verdict_domain::{Model, SessionKey};

struct RegistryEntry {
    session: Arc<OnceCell<Arc<Session>>>,
    last_access: Instant,
}

impl RegistryEntry {
    fn new(now: Instant) -> Self {
        Self {
            session: Arc::new(OnceCell::new()),
            last_access: now,
        }
    }
}

/// Keyed store of live sessions with lazy TTL eviction
pub struct SessionRegistry<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    model: Model,
    params: SessionParams,
    logger: Arc<dyn ConversationLogger>,
    entries: Mutex<HashMap<SessionKey, RegistryEntry>>,
}

impl<G: LlmGateway + 'static> SessionRegistry<G> {
    pub fn new(gateway: Arc<G>, model: Model) -> Self {
        Self {
            gateway,
            model,
            params: SessionParams::default(),
            logger: Arc::new(NoConversationLogger),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Parameters handed to every session this registry creates
    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn ttl(&self) -> Duration {
        self.params.ttl
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<SessionKey, RegistryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the session stored under `key`, creating it if needed.
    ///
    /// `instructions` are only used when the session is created; on a hit
    /// they are ignored and the existing session is returned unchanged.
    /// A failed creation leaves no session behind, so the next call retries.
    pub async fn get_or_create(
        &self,
        key: &SessionKey,
        instructions: Option<&str>,
    ) -> Result<Arc<Session>, GatewayError> {
        let cell = {
            let mut entries = self.lock_entries();
            let now = Instant::now();
            Self::sweep_locked(&mut entries, now, self.params.ttl);

            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| RegistryEntry::new(now));
            entry.last_access = now;
            Arc::clone(&entry.session)
        };

        let session = cell
            .get_or_try_init(|| self.create_session(key, instructions))
            .await?;

        Ok(Arc::clone(session))
    }

    /// Look up an existing session without creating one.
    pub fn get(&self, key: &SessionKey) -> Option<Arc<Session>> {
        let mut entries = self.lock_entries();
        let now = Instant::now();
        Self::sweep_locked(&mut entries, now, self.params.ttl);

        let entry = entries.get_mut(key)?;
        let session = entry.session.get().cloned()?;
        entry.last_access = now;
        Some(session)
    }

    /// Evict every idle session now. Returns the number of evicted entries.
    pub fn sweep(&self) -> usize {
        let mut entries = self.lock_entries();
        Self::sweep_locked(&mut entries, Instant::now(), self.params.ttl)
    }

    /// Whether a session is currently stored under `key` (no sweep, no touch)
    pub fn contains(&self, key: &SessionKey) -> bool {
        self.lock_entries()
            .get(key)
            .is_some_and(|entry| entry.session.initialized())
    }

    /// Number of stored sessions (no sweep)
    pub fn len(&self) -> usize {
        self.lock_entries()
            .values()
            .filter(|entry| entry.session.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep_locked(
        entries: &mut HashMap<SessionKey, RegistryEntry>,
        now: Instant,
        ttl: Duration,
    ) -> usize {
        let before = entries.len();
        entries.retain(|key, entry| {
            let keep = now.saturating_duration_since(entry.last_access) <= ttl;
            if !keep {
                debug!(session = %key, "Evicting idle session");
            }
            keep
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            info!(evicted, remaining = entries.len(), "Swept idle sessions");
        }
        evicted
    }

    async fn create_session(
        &self,
        key: &SessionKey,
        instructions: Option<&str>,
    ) -> Result<Arc<Session>, GatewayError> {
        let conversation = match instructions {
            Some(system_prompt) => {
                self.gateway
                    .create_session_with_system_prompt(&self.model, system_prompt)
                    .await?
            }
            None => self.gateway.create_session(&self.model).await?,
        };

        info!(session = %key, model = %self.model, "Created session");

        Ok(Arc::new(
            Session::new(key.clone(), conversation)
                .with_instructions(instructions.map(str::to_string))
                .with_params(self.params.clone())
                .with_logger(Arc::clone(&self.logger)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGateway, fast_params};
    use futures::future::join_all;

    fn key(raw: &str) -> SessionKey {
        SessionKey::new(raw).unwrap()
    }

    fn registry(gateway: MockGateway) -> (SessionRegistry<MockGateway>, Arc<MockGateway>) {
        let gateway = Arc::new(gateway);
        let registry = SessionRegistry::new(Arc::clone(&gateway), Model::default())
            .with_params(fast_params().with_ttl(Duration::from_secs(10)));
        (registry, gateway)
    }

    #[tokio::test]
    async fn test_same_key_returns_same_session() {
        let (registry, gateway) = registry(MockGateway::echo());

        let first = registry.get_or_create(&key("u1_expert"), None).await.unwrap();
        let second = registry.get_or_create(&key("u1_expert"), None).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(gateway.created(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_get_distinct_sessions() {
        let (registry, gateway) = registry(MockGateway::echo());

        let expert = registry.get_or_create(&key("u1_expert"), None).await.unwrap();
        let judge = registry.get_or_create(&key("u1_judge"), None).await.unwrap();
        let other = registry.get_or_create(&key("u2_expert"), None).await.unwrap();

        assert!(!Arc::ptr_eq(&expert, &judge));
        assert!(!Arc::ptr_eq(&expert, &other));
        assert_eq!(gateway.created(), 3);
        assert_eq!(judge.key().as_str(), "u1_judge");
    }

    #[tokio::test]
    async fn test_instructions_apply_only_at_creation() {
        let (registry, gateway) = registry(MockGateway::echo());
        let k = key("u1_expert");

        let first = registry.get_or_create(&k, Some("first")).await.unwrap();
        let second = registry.get_or_create(&k, Some("second")).await.unwrap();
        let third = registry.get_or_create(&k, None).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(third.instructions(), Some("first"));
        assert_eq!(gateway.system_prompts(), vec![Some("first".to_string())]);
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let (registry, gateway) = registry(MockGateway::echo());

        assert!(registry.get(&key("missing")).is_none());
        assert!(registry.is_empty());
        assert_eq!(gateway.created(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_is_evicted() {
        let (registry, gateway) = registry(MockGateway::echo());
        let k = key("u1_expert");
        let original = registry.get_or_create(&k, None).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        assert!(registry.get(&k).is_none());
        assert!(!registry.contains(&k));

        let recreated = registry.get_or_create(&k, None).await.unwrap();
        assert!(!Arc::ptr_eq(&original, &recreated));
        assert_eq!(gateway.created(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_idle_exactly_ttl_is_kept() {
        let (registry, _) = registry(MockGateway::echo());
        let k = key("u1_expert");
        registry.get_or_create(&k, None).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(registry.sweep(), 0);
        assert!(registry.contains(&k));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(registry.sweep(), 1);
        assert!(!registry.contains(&k));
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_refreshes_ttl() {
        let (registry, gateway) = registry(MockGateway::echo());
        let k = key("u1_expert");
        let original = registry.get_or_create(&k, None).await.unwrap();

        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(6)).await;
            let again = registry.get_or_create(&k, None).await.unwrap();
            assert!(Arc::ptr_eq(&original, &again));
        }

        assert_eq!(gateway.created(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_evicts_only_idle_sessions() {
        let (registry, _) = registry(MockGateway::echo());
        registry.get_or_create(&key("old"), None).await.unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        registry.get_or_create(&key("fresh"), None).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(registry.sweep(), 1);
        assert!(!registry.contains(&key("old")));
        assert!(registry.contains(&key("fresh")));
        assert_eq!(registry.sweep(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicted_session_stays_usable_by_holders() {
        let (registry, _) = registry(MockGateway::echo());
        let session = registry.get_or_create(&key("u1_expert"), None).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(registry.sweep(), 1);

        let outcome = session.send("still there?").await.unwrap();
        assert_eq!(outcome.response, "echo: still there?");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_creation_happens_once() {
        let (registry, gateway) =
            registry(MockGateway::echo().with_create_delay(Duration::from_millis(50)));
        let k = key("u1_expert");

        let sessions = join_all((0..10).map(|_| registry.get_or_create(&k, Some("shared")))).await;

        let first = sessions[0].as_ref().unwrap();
        for session in &sessions {
            assert!(Arc::ptr_eq(first, session.as_ref().unwrap()));
        }
        assert_eq!(gateway.created(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_creation_does_not_block_other_keys() {
        let (registry, _) =
            registry(MockGateway::echo().with_create_delay(Duration::from_secs(1)));

        let (ka, kb) = (key("a"), key("b"));
        let started = tokio::time::Instant::now();
        let (a, b) = tokio::join!(
            registry.get_or_create(&ka, None),
            registry.get_or_create(&kb, None)
        );

        assert!(a.is_ok() && b.is_ok());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_failed_creation_is_retried() {
        let (registry, gateway) = registry(MockGateway::echo().failing_creation(1));
        let k = key("u1_expert");

        let err = registry.get_or_create(&k, None).await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
        assert!(!registry.contains(&k));
        assert!(registry.get(&k).is_none());

        registry.get_or_create(&k, None).await.unwrap();
        assert!(registry.contains(&k));
        assert_eq!(gateway.created(), 1);
    }
}
