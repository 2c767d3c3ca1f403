//! PII-solicitation heuristic over generated text
//!
//! Asking for contact details is only allowed in the terminal lead-capture
//! phase. In every other phase a match means the generated reply must be
//! discarded or rewritten by the host.

use once_cell::sync::Lazy;

use onboarding_core::Phase;

use crate::patterns::PatternTable;

static PII_REQUEST: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "pii_request",
        &[
            (
                "your_contact_field",
                r"\byour (?:work |business |personal |best |contact )?(?:email|e-mail|phone|mobile|number|address|full name|name)\b",
            ),
            (
                "preferred_contact_field",
                r"\b(?:best|good|preferred) (?:contact |work )?(?:email|e-mail|phone|number to reach)\b",
            ),
            (
                "share_contact_field",
                r"\b(?:share|give|provide|leave|drop) (?:me |us )?(?:an?|the) (?:email|e-mail|phone number)\b",
            ),
            ("email_address", r"\be-?mail address\b"),
            ("phone_number", r"\b(?:phone|mobile|cell) number\b"),
            ("contact_details", r"\bcontact (?:info|information|details)\b"),
            ("reach_you", r"\b(?:how|where) (?:can|should|could) (?:i|we) reach you\b"),
            ("who_am_i_speaking_with", r"\bwho am i (?:speaking|talking) (?:with|to)\b"),
        ],
    )
});

/// Label of the first contact-information request found in `text`
pub fn pii_request_label(text: &str) -> Option<&'static str> {
    PII_REQUEST.first_match(text)
}

/// Whether `text` solicits contact details outside the terminal phase
pub fn detect_pii_request(text: &str, phase: Phase) -> bool {
    if phase.is_terminal() {
        return false;
    }
    pii_request_label(text).is_some()
}
