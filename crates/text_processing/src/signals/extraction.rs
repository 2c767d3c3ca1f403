//! Pain-point and framework extraction from user text
//!
//! Unlike the other detectors these are multi-match: every label whose pattern
//! matches is returned, in table order.

use once_cell::sync::Lazy;

use crate::patterns::PatternTable;

static PAIN_POINTS: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "pain_point",
        &[
            ("audit_preparation", r"\baudit(?:s|ors?)?\b"),
            ("evidence_collection", r"\bevidence\b|\bscreenshots?\b"),
            ("vendor_risk", r"\bvendors?\b|\bthird[- ]part(?:y|ies)\b"),
            (
                "security_questionnaires",
                r"\bquestionnaires?\b|\bsecurity reviews?\b|\brfps?\b",
            ),
            ("policy_management", r"\bpolic(?:y|ies)\b"),
            (
                "manual_work",
                r"\bmanual(?:ly)?\b|\bspreadsheets?\b|\btakes? forever\b|\btime[- ]consuming\b",
            ),
            (
                "deadline_pressure",
                r"\bdeadlines?\b|\burgent(?:ly)?\b|\basap\b|\bby (?:next|the end of) (?:week|month|quarter)\b",
            ),
            ("access_reviews", r"\baccess reviews?\b|\boffboarding\b|\buser access\b"),
        ],
    )
});

static FRAMEWORKS: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "framework",
        &[
            ("SOC 2", r"\bsoc\s*-?\s*(?:2|ii|two)\b"),
            ("ISO 27001", r"\biso\s*-?\s*27001\b"),
            ("HIPAA", r"\bhipaa\b"),
            ("GDPR", r"\bgdpr\b"),
            ("PCI DSS", r"\bpci(?:[\s-]*dss)?\b"),
            ("CCPA", r"\bccpa\b"),
            ("NIST", r"\bnist\b"),
            ("FedRAMP", r"\bfedramp\b"),
        ],
    )
});

/// Every pain-point label mentioned in `text`
pub fn extract_pain_points(text: &str) -> Vec<&'static str> {
    PAIN_POINTS.all_matches(text)
}

/// Every compliance framework mentioned in `text`
pub fn extract_frameworks(text: &str) -> Vec<&'static str> {
    FRAMEWORKS.all_matches(text)
}
