//! Analytics Event Taxonomy
//!
//! Every transition attempt (accepted or rejected) and every detected signal
//! becomes one or more typed events. The 22 event names are a wire contract
//! with downstream telemetry and must not change.
//!
//! Events are produced by the core and handed to the host; the core never
//! retains them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Phase;

/// Event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Session lifecycle
    SessionStarted,
    SessionResumed,
    SessionCompleted,
    LeadCaptured,

    // Phase transition
    StateEntered,
    GreetingCompleted,
    ProblemIdentified,
    DemoInitiated,
    ValueReinforced,
    ObjectionRaised,
    CtaOffered,

    // User action
    MessageSent,
    QuickReplySelected,
    CtaAccepted,
    CtaDeclined,
    OffTopicDetected,
    PainPointDetected,

    // Guardrail
    PrematureCaptureBlocked,
    InvalidTransitionBlocked,
    PiiRequestBlocked,

    // Drop-off / re-engagement (host driven)
    SessionAbandoned,
    SessionReengaged,
}

/// Event grouping used by dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    SessionLifecycle,
    PhaseTransition,
    UserAction,
    Guardrail,
    DropOff,
}

impl EventType {
    /// All 22 event types
    pub const ALL: [EventType; 22] = [
        EventType::SessionStarted,
        EventType::SessionResumed,
        EventType::SessionCompleted,
        EventType::LeadCaptured,
        EventType::StateEntered,
        EventType::GreetingCompleted,
        EventType::ProblemIdentified,
        EventType::DemoInitiated,
        EventType::ValueReinforced,
        EventType::ObjectionRaised,
        EventType::CtaOffered,
        EventType::MessageSent,
        EventType::QuickReplySelected,
        EventType::CtaAccepted,
        EventType::CtaDeclined,
        EventType::OffTopicDetected,
        EventType::PainPointDetected,
        EventType::PrematureCaptureBlocked,
        EventType::InvalidTransitionBlocked,
        EventType::PiiRequestBlocked,
        EventType::SessionAbandoned,
        EventType::SessionReengaged,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::SessionStarted => "session_started",
            EventType::SessionResumed => "session_resumed",
            EventType::SessionCompleted => "session_completed",
            EventType::LeadCaptured => "lead_captured",
            EventType::StateEntered => "state_entered",
            EventType::GreetingCompleted => "greeting_completed",
            EventType::ProblemIdentified => "problem_identified",
            EventType::DemoInitiated => "demo_initiated",
            EventType::ValueReinforced => "value_reinforced",
            EventType::ObjectionRaised => "objection_raised",
            EventType::CtaOffered => "cta_offered",
            EventType::MessageSent => "message_sent",
            EventType::QuickReplySelected => "quick_reply_selected",
            EventType::CtaAccepted => "cta_accepted",
            EventType::CtaDeclined => "cta_declined",
            EventType::OffTopicDetected => "off_topic_detected",
            EventType::PainPointDetected => "pain_point_detected",
            EventType::PrematureCaptureBlocked => "premature_capture_blocked",
            EventType::InvalidTransitionBlocked => "invalid_transition_blocked",
            EventType::PiiRequestBlocked => "pii_request_blocked",
            EventType::SessionAbandoned => "session_abandoned",
            EventType::SessionReengaged => "session_reengaged",
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            EventType::SessionStarted
            | EventType::SessionResumed
            | EventType::SessionCompleted
            | EventType::LeadCaptured => EventCategory::SessionLifecycle,
            EventType::StateEntered
            | EventType::GreetingCompleted
            | EventType::ProblemIdentified
            | EventType::DemoInitiated
            | EventType::ValueReinforced
            | EventType::ObjectionRaised
            | EventType::CtaOffered => EventCategory::PhaseTransition,
            EventType::MessageSent
            | EventType::QuickReplySelected
            | EventType::CtaAccepted
            | EventType::CtaDeclined
            | EventType::OffTopicDetected
            | EventType::PainPointDetected => EventCategory::UserAction,
            EventType::PrematureCaptureBlocked
            | EventType::InvalidTransitionBlocked
            | EventType::PiiRequestBlocked => EventCategory::Guardrail,
            EventType::SessionAbandoned | EventType::SessionReengaged => EventCategory::DropOff,
        }
    }

    /// Phase-specific events fired when a phase is entered, after `state_entered`
    pub fn on_enter(phase: Phase) -> &'static [EventType] {
        match phase {
            Phase::Welcome => &[],
            Phase::Discovery => &[EventType::GreetingCompleted],
            Phase::Demo => &[EventType::ProblemIdentified, EventType::DemoInitiated],
            Phase::ValueReinforcement => &[EventType::ValueReinforced],
            Phase::ObjectionHandling => &[EventType::ObjectionRaised],
            Phase::SoftCta => &[EventType::CtaOffered],
            Phase::LeadCapture => &[EventType::LeadCaptured, EventType::SessionCompleted],
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payload
///
/// Always carries the session id; everything else is present only where it
/// applies to the event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    pub session_id: String,
    /// Phase the session is in after the event
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub to_phase: Option<Phase>,
    /// Detector labels relevant to the event
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub labels: Vec<String>,
    /// Bounded excerpt of the triggering text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message_count: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub pain_points: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub frameworks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub objections: Vec<String>,
}

impl EventPayload {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            phase: None,
            from_phase: None,
            to_phase: None,
            labels: Vec::new(),
            excerpt: None,
            message_count: None,
            pain_points: Vec::new(),
            frameworks: Vec::new(),
            objections: Vec::new(),
        }
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Set both ends of a transition
    pub fn with_transition(mut self, from: Phase, to: Phase) -> Self {
        self.from_phase = Some(from);
        self.to_phase = Some(to);
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_message_count(mut self, count: u64) -> Self {
        self.message_count = Some(count);
        self
    }

    /// Attach the memory collections
    pub fn with_memory(mut self, memory: &crate::ConversationMemory) -> Self {
        self.pain_points = memory.pain_points().to_vec();
        self.frameworks = memory.frameworks().to_vec();
        self.objections = memory.objections().to_vec();
        self
    }
}

/// Immutable analytics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event_type: EventType,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl AnalyticsEvent {
    /// Create an event; the session id is taken from the payload
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            event_type,
            session_id: payload.session_id.clone(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Event with a bare payload
    pub fn simple(event_type: EventType, session_id: impl Into<String>) -> Self {
        Self::new(event_type, EventPayload::new(session_id))
    }
}

/// Event types of a batch, in order (handy for assertions and logging)
pub fn event_types(events: &[AnalyticsEvent]) -> Vec<EventType> {
    events.iter().map(|e| e.event_type).collect()
}
