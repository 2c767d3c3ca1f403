//! Guardrail Engine
//!
//! `attempt_transition` is the only code path that moves a session to a new
//! phase. Checks run in a fixed order:
//!
//! 1. Premature capture: the terminal phase requires both the demo and the
//!    soft call-to-action phases in the session's history.
//! 2. Structural: the edge must exist in the transition table.
//!
//! A rejection leaves the session untouched and is reported as an event. It is
//! an expected outcome, not an error.
//!
//! The call-to-action status in memory follows the soft CTA edges, so it stays
//! in step with the `cta_*` events whatever triggered the move.

use crate::{can_transition, AnalyticsEvent, CtaStatus, EventPayload, EventType, Phase, Session};

/// Phases that must appear in history before the terminal phase is allowed
pub const CAPTURE_PREREQUISITES: [Phase; 2] = [Phase::Demo, Phase::SoftCta];

/// Result of a transition attempt
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// Whether the session moved to the requested phase
    pub allowed: bool,
    /// Events in emission order
    pub events: Vec<AnalyticsEvent>,
}

impl TransitionOutcome {
    fn rejected(event: AnalyticsEvent) -> Self {
        Self {
            allowed: false,
            events: vec![event],
        }
    }
}

/// Validate and, if allowed, apply a transition
pub fn attempt_transition(session: &mut Session, to: Phase) -> TransitionOutcome {
    let from = session.phase();
    let blocked_payload = || {
        EventPayload::new(session.id())
            .with_phase(from)
            .with_transition(from, to)
    };

    if to.is_terminal() {
        let missing: Vec<Phase> = CAPTURE_PREREQUISITES
            .iter()
            .copied()
            .filter(|p| !session.has_visited(*p))
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                session_id = %session.id(),
                %from,
                %to,
                missing = ?missing,
                "Premature lead capture blocked"
            );
            let labels = missing.iter().map(|p| p.code().to_string()).collect();
            return TransitionOutcome::rejected(AnalyticsEvent::new(
                EventType::PrematureCaptureBlocked,
                blocked_payload().with_labels(labels),
            ));
        }
    }

    if !can_transition(from, to) {
        tracing::warn!(session_id = %session.id(), %from, %to, "Invalid transition blocked");
        return TransitionOutcome::rejected(AnalyticsEvent::new(
            EventType::InvalidTransitionBlocked,
            blocked_payload(),
        ));
    }

    session.enter_phase(to);
    let cta_status = match (from, to) {
        (Phase::SoftCta, Phase::LeadCapture) => Some(CtaStatus::Accepted),
        (Phase::SoftCta, Phase::ValueReinforcement) => Some(CtaStatus::Declined),
        (_, Phase::SoftCta) => Some(CtaStatus::Pending),
        _ => None,
    };
    if let Some(status) = cta_status {
        session.memory_mut().set_cta_status(status);
    }
    tracing::info!(
        session_id = %session.id(),
        %from,
        %to,
        label = to.label(),
        "Phase transition"
    );

    let entered_payload = || {
        EventPayload::new(session.id())
            .with_phase(to)
            .with_transition(from, to)
    };

    let mut events = Vec::with_capacity(4);
    events.push(AnalyticsEvent::new(EventType::StateEntered, entered_payload()));

    match cta_status {
        Some(CtaStatus::Accepted) => {
            events.push(AnalyticsEvent::new(EventType::CtaAccepted, entered_payload()));
        }
        Some(CtaStatus::Declined) => {
            events.push(AnalyticsEvent::new(EventType::CtaDeclined, entered_payload()));
        }
        _ => {}
    }

    for event_type in EventType::on_enter(to) {
        let payload = match event_type {
            EventType::ProblemIdentified
            | EventType::ObjectionRaised
            | EventType::LeadCaptured
            | EventType::SessionCompleted => entered_payload().with_memory(session.memory()),
            _ => entered_payload(),
        };
        events.push(AnalyticsEvent::new(*event_type, payload));
    }

    TransitionOutcome {
        allowed: true,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_types;

    #[test]
    fn test_allowed_transition() {
        let mut session = Session::new("g-1");
        let outcome = attempt_transition(&mut session, Phase::Discovery);
        assert!(outcome.allowed);
        assert_eq!(session.phase(), Phase::Discovery);
        assert_eq!(session.previous_phase(), Some(Phase::Welcome));
        assert_eq!(session.history().len(), 2);
        assert_eq!(
            event_types(&outcome.events),
            vec![EventType::StateEntered, EventType::GreetingCompleted]
        );
    }

    #[test]
    fn test_structural_block() {
        let mut session = Session::new("g-2");
        let outcome = attempt_transition(&mut session, Phase::Demo);
        assert!(!outcome.allowed);
        assert_eq!(session.phase(), Phase::Welcome);
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            event_types(&outcome.events),
            vec![EventType::InvalidTransitionBlocked]
        );
        let payload = &outcome.events[0].payload;
        assert_eq!(payload.from_phase, Some(Phase::Welcome));
        assert_eq!(payload.to_phase, Some(Phase::Demo));
    }

    #[test]
    fn test_premature_capture_checked_before_table() {
        // S1 -> S7 is also missing from the table; the capture guardrail wins
        let mut session = Session::new("g-3");
        let outcome = attempt_transition(&mut session, Phase::LeadCapture);
        assert!(!outcome.allowed);
        assert_eq!(
            event_types(&outcome.events),
            vec![EventType::PrematureCaptureBlocked]
        );
        assert_eq!(outcome.events[0].payload.labels, vec!["S3", "S6"]);
    }

    #[test]
    fn test_forced_phase_cannot_skip_to_capture() {
        let mut session = Session::new("g-4");
        session.force_phase(Phase::SoftCta);
        let outcome = attempt_transition(&mut session, Phase::LeadCapture);
        assert!(!outcome.allowed);
        assert_eq!(session.phase(), Phase::SoftCta);
        assert_eq!(
            event_types(&outcome.events),
            vec![EventType::PrematureCaptureBlocked]
        );
    }

    #[test]
    fn test_cta_accept_and_decline_events() {
        let path = [
            Phase::Welcome,
            Phase::Discovery,
            Phase::Demo,
            Phase::ValueReinforcement,
            Phase::SoftCta,
        ];
        let mut declined = Session::with_history("g-5", &path).unwrap();
        let outcome = attempt_transition(&mut declined, Phase::ValueReinforcement);
        assert!(outcome.allowed);
        assert_eq!(
            event_types(&outcome.events),
            vec![
                EventType::StateEntered,
                EventType::CtaDeclined,
                EventType::ValueReinforced
            ]
        );

        let mut accepted = Session::with_history("g-6", &path).unwrap();
        let outcome = attempt_transition(&mut accepted, Phase::LeadCapture);
        assert!(outcome.allowed);
        assert_eq!(
            event_types(&outcome.events),
            vec![
                EventType::StateEntered,
                EventType::CtaAccepted,
                EventType::LeadCaptured,
                EventType::SessionCompleted
            ]
        );
    }

    #[test]
    fn test_cta_status_follows_soft_cta_edges() {
        let path = [
            Phase::Welcome,
            Phase::Discovery,
            Phase::Demo,
            Phase::ValueReinforcement,
            Phase::SoftCta,
        ];
        let mut session = Session::with_history("g-8", &path).unwrap();
        assert_eq!(session.memory().cta_status(), CtaStatus::Pending);

        assert!(attempt_transition(&mut session, Phase::ValueReinforcement).allowed);
        assert_eq!(session.memory().cta_status(), CtaStatus::Declined);

        // A fresh offer is unanswered again
        assert!(attempt_transition(&mut session, Phase::SoftCta).allowed);
        assert_eq!(session.memory().cta_status(), CtaStatus::Pending);

        assert!(attempt_transition(&mut session, Phase::LeadCapture).allowed);
        assert_eq!(session.memory().cta_status(), CtaStatus::Accepted);
    }

    #[test]
    fn test_blocked_transition_keeps_cta_status() {
        let mut session = Session::new("g-9");
        session.force_phase(Phase::SoftCta);
        session.memory_mut().set_cta_status(CtaStatus::Declined);
        assert!(!attempt_transition(&mut session, Phase::LeadCapture).allowed);
        assert_eq!(session.memory().cta_status(), CtaStatus::Declined);
    }

    #[test]
    fn test_demo_entry_events() {
        let mut session = Session::with_history("g-7", &[Phase::Discovery]).unwrap();
        let outcome = attempt_transition(&mut session, Phase::Demo);
        assert_eq!(
            event_types(&outcome.events),
            vec![
                EventType::StateEntered,
                EventType::ProblemIdentified,
                EventType::DemoInitiated
            ]
        );
    }
}
