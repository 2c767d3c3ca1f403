//! Session State
//!
//! One `Session` per conversation. The host creates, stores, and evicts
//! sessions; the core only reads and mutates the value it is handed.
//!
//! A session's phase history is seeded at construction and only ever appended
//! to, so a live `Session` can never have an empty history. Snapshots restored
//! from outside go through `TryFrom<SessionSnapshot>` which rejects an empty
//! history.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConversationMemory, LeadDetails, OnboardingError, Phase, Result};

/// A phase entered at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEntry {
    pub phase: Phase,
    pub entered_at: DateTime<Utc>,
}

impl PhaseEntry {
    pub fn now(phase: Phase) -> Self {
        Self {
            phase,
            entered_at: Utc::now(),
        }
    }
}

/// One ongoing conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: String,
    phase: Phase,
    previous_phase: Option<Phase>,
    history: Vec<PhaseEntry>,
    message_count: u64,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    memory: ConversationMemory,
}

/// Create a fresh session in the initial phase
pub fn create_session(id: impl Into<String>) -> Session {
    Session::new(id)
}

impl Session {
    /// Create a new session in the initial phase
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            phase: Phase::INITIAL,
            previous_phase: None,
            history: vec![PhaseEntry {
                phase: Phase::INITIAL,
                entered_at: now,
            }],
            message_count: 0,
            created_at: now,
            last_activity: now,
            memory: ConversationMemory::new(),
        }
    }

    /// Build a session whose history is exactly `phases`, sitting in the last one
    ///
    /// Intended for checkpoint restore and tests. Fails on an empty list.
    pub fn with_history(id: impl Into<String>, phases: &[Phase]) -> Result<Self> {
        let id = id.into();
        let Some(&last) = phases.last() else {
            return Err(OnboardingError::EmptyHistory(id));
        };

        let mut session = Self::new(id);
        session.history = phases.iter().map(|p| PhaseEntry::now(*p)).collect();
        session.previous_phase = phases.len().checked_sub(2).map(|i| phases[i]);
        session.phase = last;
        Ok(session)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn previous_phase(&self) -> Option<Phase> {
        self.previous_phase
    }

    pub fn history(&self) -> &[PhaseEntry] {
        &self.history
    }

    /// Whether the session has ever entered `phase`
    pub fn has_visited(&self, phase: Phase) -> bool {
        self.history.iter().any(|entry| entry.phase == phase)
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Time since the last recorded activity
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_activity
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut ConversationMemory {
        &mut self.memory
    }

    /// Count an inbound user message and bump last activity
    pub fn record_message(&mut self) {
        self.message_count += 1;
        self.last_activity = Utc::now();
    }

    /// Apply an already-validated transition
    pub(crate) fn enter_phase(&mut self, to: Phase) {
        self.previous_phase = Some(self.phase);
        self.phase = to;
        self.history.push(PhaseEntry::now(to));
    }

    /// Force set phase without validation or history
    ///
    /// Bypasses every guardrail. Use only for checkpoint repair or tests.
    pub fn force_phase(&mut self, phase: Phase) {
        tracing::debug!(session_id = %self.id, from = %self.phase, to = %phase, "Forcing phase");
        self.previous_phase = Some(self.phase);
        self.phase = phase;
    }

    /// Record contact details; only valid once the terminal phase is reached
    pub fn record_lead(&mut self, details: LeadDetails) -> Result<()> {
        if !self.phase.is_terminal() {
            return Err(OnboardingError::LeadOutsideTerminalPhase(self.phase));
        }
        if !details.is_empty() {
            self.memory.merge_lead(details);
        }
        Ok(())
    }

    /// Serializable checkpoint of this session
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            phase: self.phase,
            previous_phase: self.previous_phase,
            history: self.history.clone(),
            message_count: self.message_count,
            created_at: self.created_at,
            last_activity: self.last_activity,
            memory: self.memory.clone(),
        }
    }
}

/// Serializable session checkpoint for host-side persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub phase: Phase,
    #[serde(default)]
    pub previous_phase: Option<Phase>,
    pub history: Vec<PhaseEntry>,
    pub message_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    #[serde(default)]
    pub memory: ConversationMemory,
}

impl TryFrom<SessionSnapshot> for Session {
    type Error = OnboardingError;

    fn try_from(snapshot: SessionSnapshot) -> Result<Self> {
        if snapshot.history.is_empty() {
            return Err(OnboardingError::EmptyHistory(snapshot.id));
        }
        Ok(Self {
            id: snapshot.id,
            phase: snapshot.phase,
            previous_phase: snapshot.previous_phase,
            history: snapshot.history,
            message_count: snapshot.message_count,
            created_at: snapshot.created_at,
            last_activity: snapshot.last_activity,
            memory: snapshot.memory,
        })
    }
}
