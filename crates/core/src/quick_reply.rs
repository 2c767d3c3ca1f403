//! Quick-reply suggestions surfaced to the end user for each phase

use serde::Serialize;

use crate::Phase;

/// A suggested reply chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickReply {
    /// Text shown on the chip
    pub label: &'static str,
    /// Text sent as the user message when selected
    pub value: &'static str,
}

const fn qr(label: &'static str, value: &'static str) -> QuickReply {
    QuickReply { label, value }
}

const WELCOME: &[QuickReply] = &[
    qr("Get SOC 2 ready", "I need help getting SOC 2 compliant"),
    qr("Prepare for an audit", "We have an audit coming up"),
    qr("Just browsing", "I'm just looking around for now"),
];

const DISCOVERY: &[QuickReply] = &[
    qr("Evidence collection", "Collecting audit evidence takes forever"),
    qr("Vendor reviews", "Vendor risk reviews are a pain"),
    qr("Security questionnaires", "We drown in security questionnaires"),
    qr("Show me a demo", "Can you show me how it works?"),
];

const DEMO: &[QuickReply] = &[
    qr("How long does setup take?", "How long does setup take?"),
    qr("Which frameworks?", "Which frameworks do you support?"),
    qr("Looks great", "That looks really useful"),
];

const VALUE_REINFORCEMENT: &[QuickReply] = &[
    qr("What does it cost?", "What does pricing look like?"),
    qr("Is my data safe?", "How do you handle privacy of our data?"),
    qr("I'm convinced", "This sounds like what we need"),
];

const OBJECTION_HANDLING: &[QuickReply] = &[
    qr("That helps", "That answers my concern"),
    qr("Still unsure", "I'm still not sure"),
    qr("Compare alternatives", "How do you compare to other tools?"),
];

const SOFT_CTA: &[QuickReply] = &[
    qr("Yes, set it up", "Yes, set it up!"),
    qr("Not right now", "Not right now"),
    qr("Tell me more", "Can you tell me more first?"),
];

const LEAD_CAPTURE: &[QuickReply] = &[
    qr("Share my work email", "My work email is "),
    qr("Book a call instead", "I'd rather book a call"),
];

/// Ordered, non-empty quick replies for a phase
pub fn get_quick_replies(phase: Phase) -> &'static [QuickReply] {
    match phase {
        Phase::Welcome => WELCOME,
        Phase::Discovery => DISCOVERY,
        Phase::Demo => DEMO,
        Phase::ValueReinforcement => VALUE_REINFORCEMENT,
        Phase::ObjectionHandling => OBJECTION_HANDLING,
        Phase::SoftCta => SOFT_CTA,
        Phase::LeadCapture => LEAD_CAPTURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_phase_has_replies() {
        for phase in Phase::ALL {
            let replies = get_quick_replies(phase);
            assert!(!replies.is_empty(), "{} has no quick replies", phase);
            assert!(replies.iter().all(|r| !r.label.is_empty() && !r.value.is_empty()));
        }
    }

    #[test]
    fn test_lookup_is_stable() {
        assert_eq!(
            get_quick_replies(Phase::SoftCta),
            get_quick_replies(Phase::SoftCta)
        );
        assert_eq!(get_quick_replies(Phase::SoftCta)[0].value, "Yes, set it up!");
    }
}
