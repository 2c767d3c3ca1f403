//! Conversation memory accumulator
//!
//! Folds facts extracted from a user message into the session's memory.
//! Nothing is ever removed or reordered, and labels already present are
//! skipped, so feeding the same text twice is a no-op the second time.

use onboarding_core::ConversationMemory;
use onboarding_text_processing::{
    detect_objection, extract_frameworks, extract_pain_points, truncate_excerpt, ObjectionKind,
};

/// What a single message added to memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryUpdate {
    /// Pain-point labels recorded for the first time
    pub pain_points: Vec<&'static str>,
    /// Framework labels recorded for the first time
    pub frameworks: Vec<&'static str>,
    /// Objection kind raised by the message, if any
    pub objection: Option<ObjectionKind>,
    /// Whether the objection excerpt was new to memory
    pub objection_recorded: bool,
}

impl MemoryUpdate {
    /// Whether new pain points or frameworks were recorded
    pub fn has_new_labels(&self) -> bool {
        !self.pain_points.is_empty() || !self.frameworks.is_empty()
    }

    /// Newly recorded pain points followed by newly recorded frameworks
    pub fn new_labels(&self) -> Vec<String> {
        self.pain_points
            .iter()
            .chain(self.frameworks.iter())
            .map(|label| label.to_string())
            .collect()
    }
}

/// Extract pain points, frameworks and objections from `text` into `memory`
pub fn update_from_user_text(
    memory: &mut ConversationMemory,
    text: &str,
    excerpt_chars: usize,
) -> MemoryUpdate {
    let mut update = MemoryUpdate::default();

    for label in extract_pain_points(text) {
        if memory.add_pain_point(label) {
            update.pain_points.push(label);
        }
    }

    for label in extract_frameworks(text) {
        if memory.add_framework(label) {
            update.frameworks.push(label);
        }
    }

    if let Some(kind) = detect_objection(text) {
        let excerpt = truncate_excerpt(text, excerpt_chars);
        update.objection = Some(kind);
        update.objection_recorded = memory.add_objection(&excerpt);
        tracing::debug!(
            kind = kind.as_str(),
            recorded = update.objection_recorded,
            "Objection detected"
        );
    }

    if update.has_new_labels() {
        tracing::debug!(
            pain_points = ?update.pain_points,
            frameworks = ?update.frameworks,
            "Memory updated"
        );
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_labels() {
        let mut memory = ConversationMemory::new();
        let update = update_from_user_text(
            &mut memory,
            "We need SOC 2 before our audit and vendor reviews are a mess",
            120,
        );
        assert_eq!(update.frameworks, vec!["SOC 2"]);
        assert_eq!(update.pain_points, vec!["audit_preparation", "vendor_risk"]);
        assert!(update.objection.is_none());
        assert_eq!(memory.pain_points(), &["audit_preparation", "vendor_risk"]);
    }

    #[test]
    fn test_idempotent_for_present_labels() {
        let mut memory = ConversationMemory::new();
        let text = "HIPAA audit next month, and the price worries me";
        let first = update_from_user_text(&mut memory, text, 120);
        let before = memory.clone();
        let second = update_from_user_text(&mut memory, text, 120);

        assert!(first.has_new_labels());
        assert!(first.objection_recorded);
        assert!(!second.has_new_labels());
        assert!(!second.objection_recorded);
        assert_eq!(second.objection, Some(ObjectionKind::Pricing));
        assert_eq!(memory, before);
    }

    #[test]
    fn test_objection_excerpt_is_bounded() {
        let mut memory = ConversationMemory::new();
        let text = format!("This is too expensive {}", "really ".repeat(100));
        update_from_user_text(&mut memory, &text, 40);
        assert_eq!(memory.objections().len(), 1);
        assert!(memory.objections()[0].chars().count() <= 40);
        assert!(memory.objections()[0].starts_with("This is too expensive"));
    }

    #[test]
    fn test_new_labels_order() {
        let mut memory = ConversationMemory::new();
        let update = update_from_user_text(&mut memory, "GDPR policies", 120);
        assert_eq!(update.new_labels(), vec!["policy_management", "GDPR"]);
    }
}
