//! Off-topic heuristic over user text
//!
//! A message is off-topic when it is long enough to judge and mentions none of
//! the domain terms on the allow-list. Short messages ("ok", "thanks") are
//! never flagged, and neither is anything the pain-point, framework or
//! objection detectors recognise.

use once_cell::sync::Lazy;

use super::extraction::{extract_frameworks, extract_pain_points};
use super::objection::detect_objection;
use crate::patterns::PatternTable;

/// Default minimum trimmed length, in characters, before a message is judged
pub const DEFAULT_OFF_TOPIC_MIN_CHARS: usize = 20;

static DOMAIN_TERMS: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "domain_terms",
        &[
            ("compliance", r"\bcomplian\w*|\bregulat\w*|\bcertif\w*"),
            ("frameworks", r"\bsoc\b|\biso\b|\bhipaa\b|\bgdpr\b|\bpci\b|\bccpa\b|\bnist\b|\bfedramp\b|\bframeworks?\b"),
            ("audit", r"\baudit\w*|\bevidence\b|\bcontrols?\b|\bquestionnaires?\b"),
            ("security", r"\bsecur\w*|\bprivacy\b|\bdata\b|\btrust\w*|\brisks?\b|\bpolic\w*|\bvendors?\b"),
            ("commercial", r"\bpric\w*|\bcosts?\b|\bexpensive\b|\bbudget\b|\bplans?\b|\btrial\b|\bdemo\w*|\bsign\w* up\b"),
            ("product", r"\bproduct\b|\bplatform\b|\btools?\b|\bset ?up\b|\bintegrat\w*|\bautomat\w*|\breports?\b|\baccount\b"),
            ("contact", r"\be-?mail\b|\bphone\b|\bcall\b|\bmeeting\b|\bcontact\b"),
            ("conversation", r"\bhelp\b|\bconcerns?\b|\bquestions?\b|\binterest\w*|\buseful\b|\bteam\b|\bcompany\b"),
        ],
    )
});

/// Whether `text` is long enough to judge and mentions no domain term
pub fn is_off_topic(text: &str, min_chars: usize) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < min_chars {
        return false;
    }
    if DOMAIN_TERMS.is_match(trimmed) {
        return false;
    }
    extract_frameworks(trimmed).is_empty()
        && extract_pain_points(trimmed).is_empty()
        && detect_objection(trimmed).is_none()
}
