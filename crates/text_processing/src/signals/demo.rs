//! Demo-offer heuristic over generated text
//!
//! Only consulted while the session is in discovery; first match wins.

use once_cell::sync::Lazy;

use crate::patterns::PatternTable;

static DEMO_OFFER: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(
        "demo_offer",
        &[
            ("let_me_show_you", r"\blet me show you\b"),
            ("here_is_an_example", r"\bhere(?:'|’)?s an example\b|\bhere is an example\b"),
            ("walk_you_through", r"\blet me walk you through\b"),
            ("demonstrate", r"\blet me demonstrate\b"),
            ("ill_show_you", r"\bi(?:'|’)?ll show you\b"),
            ("take_a_look", r"\btake a look at (?:how|this)\b"),
            ("heres_how_it_works", r"\bhere(?:'|’)?s how (?:it|this) works\b"),
        ],
    )
});

/// Label of the first demo-offer phrase found in `text`
pub fn detect_demo_offer(text: &str) -> Option<&'static str> {
    DEMO_OFFER.first_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_phrases() {
        assert_eq!(
            detect_demo_offer("Let me show you how this works"),
            Some("let_me_show_you")
        );
        assert_eq!(
            detect_demo_offer("Here’s an example from a customer like you."),
            Some("here_is_an_example")
        );
        assert_eq!(
            detect_demo_offer("I'll show you the evidence dashboard."),
            Some("ill_show_you")
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            detect_demo_offer("Here's an example. Let me show you."),
            Some("let_me_show_you")
        );
    }

    #[test]
    fn test_no_offer() {
        assert_eq!(detect_demo_offer("What frameworks are you working toward?"), None);
        assert_eq!(detect_demo_offer(""), None);
    }
}
