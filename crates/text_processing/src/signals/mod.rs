//! Stateless signal detectors
//!
//! Every detector is a pure function over a single text. None of them panic
//! or mutate anything, and each returns a neutral value when nothing matches.

pub mod cta;
pub mod demo;
pub mod directive;
pub mod extraction;
pub mod lead;
pub mod objection;
pub mod off_topic;
pub mod pii;

pub use cta::{classify_cta_response, detect_cta_acceptance, detect_cta_decline, CtaResponse};
pub use demo::detect_demo_offer;
pub use directive::{detect_directive, directive_token, strip_directives};
pub use extraction::{extract_frameworks, extract_pain_points};
pub use lead::extract_lead_details;
pub use objection::{detect_objection, ObjectionKind};
pub use off_topic::{is_off_topic, DEFAULT_OFF_TOPIC_MIN_CHARS};
pub use pii::{detect_pii_request, pii_request_label};

#[cfg(test)]
mod tests {
    use super::*;
    use onboarding_core::Phase;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn detectors_are_total(text in ".{0,400}") {
            let _ = detect_directive(&text);
            let _ = strip_directives(&text);
            let _ = detect_demo_offer(&text);
            let _ = detect_objection(&text);
            let _ = extract_pain_points(&text);
            let _ = extract_frameworks(&text);
            let _ = classify_cta_response(&text);
            let _ = is_off_topic(&text, DEFAULT_OFF_TOPIC_MIN_CHARS);
            let _ = extract_lead_details(&text);
            for phase in Phase::ALL {
                let _ = detect_pii_request(&text, phase);
            }
        }

        #[test]
        fn stripped_text_has_no_directive(prefix in "[a-z ]{0,40}", n in 1u8..=7) {
            let text = format!("{}[PHASE:S{}]", prefix, n);
            prop_assert!(detect_directive(&text).is_some());
            prop_assert_eq!(detect_directive(&strip_directives(&text)), None);
        }

        #[test]
        fn extracted_signals_are_never_off_topic(
            filler in "[a-z ]{0,30}",
            term in prop::sample::select(vec![
                "SOC2", "ISO27001", "HIPAA", "spreadsheets", "takes forever",
                "deadline", "offboarding", "screenshots", "how much",
            ]),
        ) {
            let text = format!("{} {} {}", filler, term, filler);
            prop_assert!(!is_off_topic(&text, 1));
        }

        #[test]
        fn pii_never_blocked_in_terminal_phase(text in ".{0,200}") {
            prop_assert!(!detect_pii_request(&text, Phase::LeadCapture));
        }
    }

    #[test]
    fn test_very_long_input() {
        let text = "audit ".repeat(20_000);
        assert_eq!(extract_pain_points(&text), vec!["audit_preparation"]);
        assert!(!is_off_topic(&text, DEFAULT_OFF_TOPIC_MIN_CHARS));
    }
}
