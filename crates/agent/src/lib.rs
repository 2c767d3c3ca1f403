//! Onboarding conversation engine
//!
//! Drives a [`Session`] through the onboarding funnel:
//! - Memory accumulation from user messages
//! - Phase rules for user input and generated replies
//! - Guardrails (premature capture, structural, contact-information requests)
//! - Prompt fragments for the external generator
//!
//! The engine is synchronous and holds no sessions. Callers own storage and
//! must serialize calls for the same session.

pub mod accumulator;
pub mod engine;
pub mod prompt;

pub use accumulator::{update_from_user_text, MemoryUpdate};
pub use engine::{process_assistant_response, process_user_input, AssistantOutcome, OnboardingEngine};
pub use prompt::{build_prompt_fragment, phase_constraints, phase_goal};

pub use onboarding_core::{
    attempt_transition, can_transition, create_session, get_quick_replies, AnalyticsEvent,
    ConversationMemory, CtaStatus, EventType, Phase, QuickReply, Session, SessionSnapshot,
    TransitionOutcome,
};
pub use onboarding_text_processing::{strip_directives, ObjectionKind};
