//! Session hosting
//!
//! Owns every live [`Session`], serializes work per session, and adds the
//! lifecycle events the engine cannot see on its own: session start and
//! resume, re-engagement after a pause, and abandonment on idle eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use onboarding_agent::{get_quick_replies, AssistantOutcome, OnboardingEngine};
use onboarding_config::SessionConfig;
use onboarding_core::{AnalyticsEvent, EventPayload, EventType, Session, SessionSnapshot};

use crate::sink::AnalyticsSink;
use crate::ServerError;

type SessionHandle = Arc<Mutex<Session>>;

/// In-memory session store with per-session locking
pub struct SessionManager {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    engine: OnboardingEngine,
    config: SessionConfig,
    sink: Arc<dyn AnalyticsSink>,
}

impl SessionManager {
    pub fn new(engine: OnboardingEngine, config: SessionConfig, sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            engine,
            config,
            sink,
        }
    }

    /// Start a background task that periodically evicts idle sessions.
    ///
    /// Returns a shutdown sender; send `true` to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = Duration::from_secs(manager.config.cleanup_interval_secs);

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let evicted = manager.evict_idle();
                        if evicted > 0 {
                            tracing::info!(
                                "Session cleanup: evicted {} idle sessions ({} remaining)",
                                evicted,
                                manager.len()
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a session under a fresh random id
    pub fn create(&self) -> Result<String, ServerError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.get_or_create(&id)?;
        Ok(id)
    }

    /// Look up a session, creating it in the initial phase if it is unknown
    pub fn get_or_create(&self, id: &str) -> Result<SessionHandle, ServerError> {
        if let Some(handle) = self.get(id) {
            return Ok(handle);
        }

        let mut sessions = self.sessions.write();
        if let Some(handle) = sessions.get(id) {
            return Ok(handle.clone());
        }
        self.ensure_capacity(&mut sessions)?;

        let handle = Arc::new(Mutex::new(Session::new(id)));
        sessions.insert(id.to_string(), handle.clone());
        drop(sessions);

        tracing::info!(session_id = %id, "Created session");
        self.sink.emit(&AnalyticsEvent::new(
            EventType::SessionStarted,
            EventPayload::new(id).with_phase(onboarding_core::Phase::INITIAL),
        ));
        Ok(handle)
    }

    /// Re-host a checkpointed session, replacing any live one with the same id
    pub fn restore(&self, snapshot: SessionSnapshot) -> Result<String, ServerError> {
        let session = Session::try_from(snapshot)?;
        let id = session.id().to_string();
        let payload = EventPayload::new(&id)
            .with_phase(session.phase())
            .with_message_count(session.message_count());

        let mut sessions = self.sessions.write();
        if !sessions.contains_key(&id) {
            self.ensure_capacity(&mut sessions)?;
        }
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        drop(sessions);

        tracing::info!(session_id = %id, "Restored session");
        self.sink
            .emit(&AnalyticsEvent::new(EventType::SessionResumed, payload));
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().get(id).cloned()
    }

    /// Run `f` against a session under its lock
    pub fn view<R>(&self, id: &str, f: impl FnOnce(&Session) -> R) -> Option<R> {
        let handle = self.get(id)?;
        let session = handle.lock();
        Some(f(&session))
    }

    /// Handle a user message for session `id`
    pub fn process_user_input(&self, id: &str, text: &str) -> Result<Vec<AnalyticsEvent>, ServerError> {
        let handle = self.require(id)?;
        let mut session = handle.lock();

        let mut events = self.reengagement(&session, Utc::now()).into_iter().collect::<Vec<_>>();
        events.extend(self.engine.process_user_input(&mut session, text));

        self.sink.emit_all(&events);
        Ok(events)
    }

    /// Handle a generated reply for session `id`
    pub fn process_assistant_response(&self, id: &str, text: &str) -> Result<AssistantOutcome, ServerError> {
        let handle = self.require(id)?;
        let mut session = handle.lock();

        let outcome = self.engine.process_assistant_response(&mut session, text);
        self.sink.emit_all(&outcome.events);
        Ok(outcome)
    }

    /// Select the `index`-th quick reply of the session's current phase
    ///
    /// Emits `quick_reply_selected`, then processes the reply's value as a
    /// user message.
    pub fn record_quick_reply(&self, id: &str, index: usize) -> Result<Vec<AnalyticsEvent>, ServerError> {
        let handle = self.require(id)?;
        let mut session = handle.lock();

        let phase = session.phase();
        let reply = get_quick_replies(phase).get(index).ok_or_else(|| {
            ServerError::InvalidRequest(format!(
                "No quick reply {} in phase {}",
                index,
                phase.code()
            ))
        })?;

        let mut events = self.reengagement(&session, Utc::now()).into_iter().collect::<Vec<_>>();
        events.push(AnalyticsEvent::new(
            EventType::QuickReplySelected,
            EventPayload::new(id)
                .with_phase(phase)
                .with_labels(vec![reply.label.to_string()])
                .with_excerpt(reply.value),
        ));
        events.extend(self.engine.process_user_input(&mut session, reply.value));

        self.sink.emit_all(&events);
        Ok(events)
    }

    pub fn snapshot(&self, id: &str) -> Option<SessionSnapshot> {
        self.view(id, Session::snapshot)
    }

    /// Evict sessions idle for longer than the configured timeout
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Utc::now())
    }

    /// Evict sessions idle at `now`; emits `session_abandoned` for each
    pub fn evict_idle_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        let abandoned = self.evict_internal(&mut sessions, now);
        drop(sessions);

        let count = abandoned.len();
        self.sink.emit_all(&abandoned);
        count
    }

    /// Remove a session without emitting anything
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Removed session");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    fn require(&self, id: &str) -> Result<SessionHandle, ServerError> {
        self.get(id)
            .ok_or_else(|| ServerError::Session(format!("Unknown session: {}", id)))
    }

    fn ensure_capacity(&self, sessions: &mut HashMap<String, SessionHandle>) -> Result<(), ServerError> {
        if sessions.len() < self.config.max_sessions {
            return Ok(());
        }
        let abandoned = self.evict_internal(sessions, Utc::now());
        self.sink.emit_all(&abandoned);
        if sessions.len() >= self.config.max_sessions {
            return Err(ServerError::Session("Max sessions reached".to_string()));
        }
        Ok(())
    }

    fn evict_internal(
        &self,
        sessions: &mut HashMap<String, SessionHandle>,
        now: DateTime<Utc>,
    ) -> Vec<AnalyticsEvent> {
        let timeout = chrono::Duration::seconds(self.config.idle_timeout_secs as i64);
        let mut abandoned = Vec::new();

        sessions.retain(|id, handle| {
            let session = handle.lock();
            if session.idle_for(now) < timeout {
                return true;
            }
            tracing::info!(session_id = %id, phase = %session.phase(), "Session abandoned");
            abandoned.push(AnalyticsEvent::new(
                EventType::SessionAbandoned,
                EventPayload::new(id.as_str())
                    .with_phase(session.phase())
                    .with_message_count(session.message_count())
                    .with_memory(session.memory()),
            ));
            false
        });

        abandoned
    }

    fn reengagement(&self, session: &Session, now: DateTime<Utc>) -> Option<AnalyticsEvent> {
        let threshold = chrono::Duration::seconds(self.config.reengage_after_secs as i64);
        let idle = session.idle_for(now);
        if session.message_count() == 0 || idle < threshold {
            return None;
        }
        tracing::info!(
            session_id = %session.id(),
            idle_secs = idle.num_seconds(),
            "Session re-engaged"
        );
        Some(AnalyticsEvent::new(
            EventType::SessionReengaged,
            EventPayload::new(session.id()).with_phase(session.phase()),
        ))
    }
}
