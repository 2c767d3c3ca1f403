//! Call-to-action acceptance and decline heuristics over user text
//!
//! Only meaningful while the session sits in the soft call-to-action phase.
//! When a message matches both lists, the decline wins: a mixed answer such
//! as "sure, but not right now" must never push the user into lead capture.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::patterns::PatternTable;

/// User response to a call-to-action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaResponse {
    Accepted,
    Declined,
}

static ACCEPT: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "cta_accept",
        &[
            (
                "affirmative",
                r"^\W*(?:yes|yeah|yep|yup|sure|ok(?:ay)?|absolutely|definitely)\b",
            ),
            ("set_it_up", r"\bset (?:it|me|us) up\b"),
            ("lets_do_it", r"\blet(?:'|’)?s do (?:it|this)\b"),
            ("sign_me_up", r"\bsign (?:me|us) up\b"),
            ("sounds_good", r"\bsounds (?:good|great)\b"),
            ("im_in", r"\bi(?:'|’)?m in\b"),
            ("get_started", r"\b(?:get|getting) started\b"),
            ("go_ahead", r"\bgo ahead\b"),
        ],
    )
});

static DECLINE: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "cta_decline",
        &[
            ("not_now", r"\bnot (?:right )?now\b"),
            ("no_thanks", r"\bno,? thanks?\b|\bno thank you\b"),
            ("maybe_later", r"\bmaybe later\b|\bsome other time\b"),
            ("not_ready", r"\bnot (?:yet|interested|ready)\b"),
            ("negative", r"^\W*(?:no|nope|nah)\b"),
            ("dont_want", r"\b(?:don(?:'|’)?t|do not) (?:want|need)\b"),
            ("need_time", r"\bneed (?:more )?time\b|\bthink about it\b"),
        ],
    )
});

/// Whether `text` accepts the call-to-action
pub fn detect_cta_acceptance(text: &str) -> bool {
    ACCEPT.is_match(text)
}

/// Whether `text` declines the call-to-action
pub fn detect_cta_decline(text: &str) -> bool {
    DECLINE.is_match(text)
}

/// Classify a reply to a call-to-action; `None` when it is neither
pub fn classify_cta_response(text: &str) -> Option<CtaResponse> {
    if detect_cta_decline(text) {
        Some(CtaResponse::Declined)
    } else if detect_cta_acceptance(text) {
        Some(CtaResponse::Accepted)
    } else {
        None
    }
}
