//! Objection heuristic over user text

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::patterns::PatternTable;

/// Kind of objection raised by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectionKind {
    Privacy,
    Pricing,
    Security,
    Competitor,
}

impl ObjectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectionKind::Privacy => "privacy",
            ObjectionKind::Pricing => "pricing",
            ObjectionKind::Security => "security",
            ObjectionKind::Competitor => "competitor",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "privacy" => Some(ObjectionKind::Privacy),
            "pricing" => Some(ObjectionKind::Pricing),
            "security" => Some(ObjectionKind::Security),
            "competitor" => Some(ObjectionKind::Competitor),
            _ => None,
        }
    }
}

static OBJECTION: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "objection",
        &[
            (
                "privacy",
                r"\bprivacy\b|\b(?:my|our) data\b|\bpersonal (?:data|information)\b|\bshare (?:my|our) (?:data|information)\b",
            ),
            (
                "pricing",
                r"\btoo (?:expensive|pricey|costly)\b|\bpric(?:e|es|ing)\b|\bcosts?\b|\bbudget\b|\bafford\b|\bhow much\b",
            ),
            (
                "security",
                r"\b(?:worried|concerned|nervous|unsure)\b.*\b(?:secur\w*|safe\w*|breach\w*|hack\w*)|\bsecurity concerns?\b|\bis (?:it|this|that) (?:secure|safe)\b|\bdata breach",
            ),
            (
                "competitor",
                r"\bcompetitors?\b|\balready (?:use|using|have)\b|\bcompared? (?:to|with)\b|\bversus\b|\bvs\.?\s|\balternatives?\b|\bother tools\b|\bvanta\b|\bdrata\b|\bsecureframe\b",
            ),
        ],
    )
});

/// First objection kind found in `text`
pub fn detect_objection(text: &str) -> Option<ObjectionKind> {
    OBJECTION.first_match(text).and_then(ObjectionKind::from_label)
}
