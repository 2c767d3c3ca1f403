//! Core types for the onboarding conversation state machine
//!
//! This crate provides the foundational pieces every other crate builds on:
//! - Phases and the static transition table
//! - Quick-reply suggestions per phase
//! - Session state and conversation memory
//! - The guardrail engine (the only mutator of a session's phase)
//! - The analytics event taxonomy
//! - Error types

pub mod error;
pub mod event;
pub mod guardrail;
pub mod memory;
pub mod phase;
pub mod quick_reply;
pub mod session;

pub use error::{OnboardingError, Result};
pub use event::{event_types, AnalyticsEvent, EventCategory, EventPayload, EventType};
pub use guardrail::{attempt_transition, TransitionOutcome, CAPTURE_PREREQUISITES};
pub use memory::{ConversationMemory, CtaStatus, LeadDetails};
pub use phase::{can_transition, Phase};
pub use quick_reply::{get_quick_replies, QuickReply};
pub use session::{create_session, PhaseEntry, Session, SessionSnapshot};
