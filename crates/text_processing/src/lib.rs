//! Text processing for the onboarding agent
//!
//! Provides:
//! - Signal detectors over user and generated text (directives, demo offers,
//!   objections, pain points, frameworks, call-to-action replies, off-topic
//!   messages, contact-information requests, lead fields)
//! - Grapheme-safe excerpt truncation for memory and event payloads

mod patterns;

pub mod excerpt;
pub mod signals;

pub use excerpt::truncate_excerpt;
pub use signals::{
    classify_cta_response, detect_cta_acceptance, detect_cta_decline, detect_demo_offer,
    detect_directive, detect_objection, detect_pii_request, directive_token,
    extract_frameworks, extract_lead_details, extract_pain_points, is_off_topic,
    pii_request_label, strip_directives, CtaResponse, ObjectionKind,
    DEFAULT_OFF_TOPIC_MIN_CHARS,
};
