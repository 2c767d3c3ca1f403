//! Orchestration entry points
//!
//! The driver calls [`OnboardingEngine::process_user_input`] for every user
//! message, asks the external generator for a reply using the prompt
//! fragment, then hands the reply to
//! [`OnboardingEngine::process_assistant_response`]. Both return the events
//! they produced in emission order; the engine keeps no state of its own.

use serde::Serialize;

use onboarding_config::DetectorConfig;
use onboarding_core::{
    attempt_transition, AnalyticsEvent, EventPayload, EventType, Phase, Session,
};
use onboarding_text_processing::{
    classify_cta_response, detect_demo_offer, detect_directive, extract_lead_details,
    is_off_topic, pii_request_label, truncate_excerpt, CtaResponse,
};

use crate::accumulator::update_from_user_text;

/// Result of processing a generated reply
#[derive(Debug, Clone, Serialize)]
pub struct AssistantOutcome {
    /// Events in emission order
    pub events: Vec<AnalyticsEvent>,
    /// The reply asked for contact details outside lead capture and must not
    /// be shown as-is
    pub pii_blocked: bool,
}

/// Stateless driver over a caller-owned [`Session`]
#[derive(Debug, Clone)]
pub struct OnboardingEngine {
    config: DetectorConfig,
}

impl Default for OnboardingEngine {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl OnboardingEngine {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Handle one user message
    ///
    /// Counts the message, updates memory, then applies the phase rule of the
    /// phase the session was in when the message arrived.
    pub fn process_user_input(&self, session: &mut Session, text: &str) -> Vec<AnalyticsEvent> {
        session.record_message();
        let phase = session.phase();
        let update =
            update_from_user_text(session.memory_mut(), text, self.config.objection_excerpt_chars);

        let mut events = Vec::new();
        events.push(AnalyticsEvent::new(
            EventType::MessageSent,
            EventPayload::new(session.id())
                .with_phase(phase)
                .with_message_count(session.message_count())
                .with_excerpt(self.excerpt(text)),
        ));

        if update.has_new_labels() {
            events.push(AnalyticsEvent::new(
                EventType::PainPointDetected,
                EventPayload::new(session.id())
                    .with_phase(phase)
                    .with_labels(update.new_labels())
                    .with_memory(session.memory()),
            ));
        }

        if is_off_topic(text, self.config.off_topic_min_chars) {
            tracing::debug!(session_id = %session.id(), %phase, "Off-topic message");
            events.push(AnalyticsEvent::new(
                EventType::OffTopicDetected,
                EventPayload::new(session.id())
                    .with_phase(phase)
                    .with_excerpt(self.excerpt(text)),
            ));
        }

        match phase {
            Phase::Welcome => {
                events.extend(attempt_transition(session, Phase::Discovery).events);
            }
            // CTA status is recorded by the transition itself
            Phase::SoftCta => match classify_cta_response(text) {
                Some(CtaResponse::Accepted) => {
                    events.extend(attempt_transition(session, Phase::LeadCapture).events);
                }
                Some(CtaResponse::Declined) => {
                    events.extend(attempt_transition(session, Phase::ValueReinforcement).events);
                }
                None => {}
            },
            Phase::ValueReinforcement if update.objection.is_some() => {
                events.extend(attempt_transition(session, Phase::ObjectionHandling).events);
            }
            Phase::LeadCapture => self.capture_lead(session, text),
            _ => {}
        }

        events
    }

    /// Handle one generated reply
    ///
    /// A contact-information request outside lead capture blocks the reply
    /// and skips every transition. Otherwise an explicit directive wins over
    /// the demo-offer heuristic.
    pub fn process_assistant_response(&self, session: &mut Session, text: &str) -> AssistantOutcome {
        let phase = session.phase();

        if !phase.is_terminal() {
            if let Some(label) = pii_request_label(text) {
                tracing::warn!(session_id = %session.id(), %phase, label, "PII request blocked");
                let event = AnalyticsEvent::new(
                    EventType::PiiRequestBlocked,
                    EventPayload::new(session.id())
                        .with_phase(phase)
                        .with_labels(vec![label.to_string()])
                        .with_excerpt(self.excerpt(text)),
                );
                return AssistantOutcome {
                    events: vec![event],
                    pii_blocked: true,
                };
            }
        }

        let mut events = Vec::new();
        match detect_directive(text) {
            Some(target) if target != phase => {
                tracing::debug!(session_id = %session.id(), %phase, %target, "Directive found");
                events.extend(attempt_transition(session, target).events);
            }
            Some(_) => {}
            None if phase == Phase::Discovery => {
                if let Some(label) = detect_demo_offer(text) {
                    tracing::debug!(session_id = %session.id(), label, "Demo offer detected");
                    events.extend(attempt_transition(session, Phase::Demo).events);
                }
            }
            None => {}
        }

        AssistantOutcome {
            events,
            pii_blocked: false,
        }
    }

    fn capture_lead(&self, session: &mut Session, text: &str) {
        let details = extract_lead_details(text);
        if details.is_empty() {
            return;
        }
        let fields: Vec<&str> = [
            details.email.as_ref().map(|_| "email"),
            details.phone.as_ref().map(|_| "phone"),
            details.name.as_ref().map(|_| "name"),
        ]
        .into_iter()
        .flatten()
        .collect();

        match session.record_lead(details) {
            Ok(()) => tracing::info!(session_id = %session.id(), fields = ?fields, "Lead details recorded"),
            Err(e) => tracing::warn!(session_id = %session.id(), error = %e, "Lead details dropped"),
        }
    }

    fn excerpt(&self, text: &str) -> String {
        truncate_excerpt(text, self.config.objection_excerpt_chars)
    }
}

/// [`OnboardingEngine::process_user_input`] with default detector settings
pub fn process_user_input(session: &mut Session, text: &str) -> Vec<AnalyticsEvent> {
    OnboardingEngine::default().process_user_input(session, text)
}

/// [`OnboardingEngine::process_assistant_response`] with default detector settings
pub fn process_assistant_response(session: &mut Session, text: &str) -> AssistantOutcome {
    OnboardingEngine::default().process_assistant_response(session, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_prompt_fragment;
    use onboarding_core::{event_types, CtaStatus};

    #[test]
    fn test_message_sent_always_first() {
        let engine = OnboardingEngine::default();
        let mut session = Session::new("e-1");
        session.force_phase(Phase::Demo);
        let events = engine.process_user_input(&mut session, "ok");
        assert_eq!(event_types(&events), vec![EventType::MessageSent]);
        assert_eq!(events[0].payload.message_count, Some(1));
        assert_eq!(session.phase(), Phase::Demo);
    }

    #[test]
    fn test_pain_point_event_only_for_new_labels() {
        let engine = OnboardingEngine::default();
        let mut session = Session::with_history("e-2", &[Phase::Discovery]).unwrap();

        let first = engine.process_user_input(&mut session, "Vendor reviews kill us");
        assert_eq!(
            event_types(&first),
            vec![EventType::MessageSent, EventType::PainPointDetected]
        );
        assert_eq!(first[1].payload.labels, vec!["vendor_risk"]);

        let second = engine.process_user_input(&mut session, "Vendor reviews kill us");
        assert_eq!(event_types(&second), vec![EventType::MessageSent]);
    }

    #[test]
    fn test_off_topic_respects_config() {
        let engine = OnboardingEngine::new(DetectorConfig {
            off_topic_min_chars: 5,
            ..Default::default()
        });
        let mut session = Session::with_history("e-3", &[Phase::Discovery]).unwrap();
        let events = engine.process_user_input(&mut session, "banana bread");
        assert_eq!(
            event_types(&events),
            vec![EventType::MessageSent, EventType::OffTopicDetected]
        );

        let default_engine = OnboardingEngine::default();
        let events = default_engine.process_user_input(&mut session, "banana bread");
        assert_eq!(event_types(&events), vec![EventType::MessageSent]);
    }

    #[test]
    fn test_pain_point_message_is_not_off_topic() {
        let engine = OnboardingEngine::default();
        let mut session = Session::with_history("e-16", &[Phase::Discovery]).unwrap();
        let events =
            engine.process_user_input(&mut session, "We need SOC2 for our enterprise deal soon");
        let types = event_types(&events);
        assert!(types.contains(&EventType::PainPointDetected));
        assert!(!types.contains(&EventType::OffTopicDetected));
    }

    #[test]
    fn test_objection_in_value_reinforcement() {
        let engine = OnboardingEngine::default();
        let path = [Phase::Welcome, Phase::Discovery, Phase::Demo, Phase::ValueReinforcement];
        let mut session = Session::with_history("e-4", &path).unwrap();
        let events = engine.process_user_input(&mut session, "Honestly it seems too expensive");
        assert_eq!(session.phase(), Phase::ObjectionHandling);
        assert!(event_types(&events).contains(&EventType::ObjectionRaised));
        assert_eq!(session.memory().objections().len(), 1);
    }

    #[test]
    fn test_objection_outside_value_reinforcement_only_recorded() {
        let engine = OnboardingEngine::default();
        let mut session = Session::with_history("e-5", &[Phase::Discovery]).unwrap();
        engine.process_user_input(&mut session, "What does it cost?");
        assert_eq!(session.phase(), Phase::Discovery);
        assert_eq!(session.memory().objections(), &["What does it cost?"]);
    }

    #[test]
    fn test_cta_without_answer_stays() {
        let engine = OnboardingEngine::default();
        let mut session = Session::new("e-6");
        session.force_phase(Phase::SoftCta);
        engine.process_user_input(&mut session, "Can you tell me more first?");
        assert_eq!(session.phase(), Phase::SoftCta);
        assert_eq!(session.memory().cta_status(), CtaStatus::Pending);
    }

    #[test]
    fn test_lead_capture_records_details() {
        let engine = OnboardingEngine::default();
        let mut session = Session::new("e-7");
        session.force_phase(Phase::LeadCapture);
        let events = engine.process_user_input(&mut session, "My work email is ana@acme.io");
        assert_eq!(event_types(&events), vec![EventType::MessageSent]);
        assert_eq!(
            session.memory().lead().and_then(|l| l.email.as_deref()),
            Some("ana@acme.io")
        );
    }

    #[test]
    fn test_directive_overrides_heuristic() {
        let engine = OnboardingEngine::default();
        let mut session = Session::with_history("e-8", &[Phase::Discovery]).unwrap();
        let outcome = engine.process_assistant_response(
            &mut session,
            "Let me show you how this works, but first a concern. [PHASE:S5]",
        );
        assert!(!outcome.pii_blocked);
        assert_eq!(session.phase(), Phase::ObjectionHandling);
    }

    #[test]
    fn test_directive_to_current_phase_is_ignored() {
        let engine = OnboardingEngine::default();
        let mut session = Session::with_history("e-9", &[Phase::Discovery]).unwrap();
        let outcome =
            engine.process_assistant_response(&mut session, "Let me show you. [PHASE:S2]");
        assert!(outcome.events.is_empty());
        assert_eq!(session.phase(), Phase::Discovery);
    }

    #[test]
    fn test_invalid_directive_is_blocked() {
        let engine = OnboardingEngine::default();
        let mut session = Session::with_history("e-10", &[Phase::Discovery]).unwrap();
        let outcome = engine.process_assistant_response(&mut session, "Moving on [PHASE:S6]");
        assert_eq!(
            event_types(&outcome.events),
            vec![EventType::InvalidTransitionBlocked]
        );
        assert_eq!(session.phase(), Phase::Discovery);
    }

    #[test]
    fn test_pii_check_runs_before_directive() {
        let engine = OnboardingEngine::default();
        let mut session = Session::with_history("e-11", &[Phase::Discovery]).unwrap();
        let outcome = engine
            .process_assistant_response(&mut session, "What's your email address? [PHASE:S3]");
        assert!(outcome.pii_blocked);
        assert_eq!(event_types(&outcome.events), vec![EventType::PiiRequestBlocked]);
        assert_eq!(session.phase(), Phase::Discovery);
    }

    #[test]
    fn test_directive_from_soft_cta_updates_cta_status() {
        let engine = OnboardingEngine::default();
        let path = [
            Phase::Welcome,
            Phase::Discovery,
            Phase::Demo,
            Phase::ValueReinforcement,
            Phase::SoftCta,
        ];

        let mut declined = Session::with_history("e-13", &path).unwrap();
        let outcome = engine
            .process_assistant_response(&mut declined, "No problem, let's recap. [PHASE:S4]");
        assert_eq!(
            event_types(&outcome.events),
            vec![
                EventType::StateEntered,
                EventType::CtaDeclined,
                EventType::ValueReinforced
            ]
        );
        assert_eq!(declined.memory().cta_status(), CtaStatus::Declined);

        let mut accepted = Session::with_history("e-14", &path).unwrap();
        engine.process_assistant_response(&mut accepted, "Great, let's get you set up. [PHASE:S7]");
        assert_eq!(accepted.phase(), Phase::LeadCapture);
        assert_eq!(accepted.memory().cta_status(), CtaStatus::Accepted);
    }

    #[test]
    fn test_repeated_offer_resets_cta_status() {
        let engine = OnboardingEngine::default();
        let path = [
            Phase::Welcome,
            Phase::Discovery,
            Phase::Demo,
            Phase::ValueReinforcement,
            Phase::SoftCta,
        ];
        let mut session = Session::with_history("e-15", &path).unwrap();
        engine.process_user_input(&mut session, "Not right now");
        assert_eq!(session.phase(), Phase::ValueReinforcement);
        assert_eq!(session.memory().cta_status(), CtaStatus::Declined);

        let outcome = engine
            .process_assistant_response(&mut session, "Want to try it on a sandbox? [PHASE:S6]");
        assert_eq!(
            event_types(&outcome.events),
            vec![EventType::StateEntered, EventType::CtaOffered]
        );
        assert_eq!(session.memory().cta_status(), CtaStatus::Pending);
        let fragment = build_prompt_fragment(session.phase(), session.memory());
        assert!(!fragment.contains("Call-to-action:"));
    }

    #[test]
    fn test_demo_heuristic_only_in_discovery() {
        let engine = OnboardingEngine::default();
        let mut session = Session::new("e-12");
        let outcome = engine.process_assistant_response(&mut session, "Let me show you around");
        assert!(outcome.events.is_empty());
        assert_eq!(session.phase(), Phase::Welcome);
    }
}
