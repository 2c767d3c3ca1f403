//! Onboarding Phases and Transition Table
//!
//! The onboarding funnel is a fixed sequence of seven phases (S1..S7). Which
//! direct moves are legal is a static table; it never changes at runtime and is
//! shared by every session.
//!
//! The table is acyclic apart from one loop-back edge: a declined soft
//! call-to-action (S6) returns the conversation to value reinforcement (S4).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::OnboardingError;

/// Onboarding phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Phase {
    /// First contact, before the user has said anything
    #[default]
    #[serde(rename = "S1")]
    Welcome,
    /// Understanding the user's situation and pain points
    #[serde(rename = "S2")]
    Discovery,
    /// Showing how the product handles their problem
    #[serde(rename = "S3")]
    Demo,
    /// Tying the demo back to their pain points
    #[serde(rename = "S4")]
    ValueReinforcement,
    /// Addressing concerns raised by the user
    #[serde(rename = "S5")]
    ObjectionHandling,
    /// Low-pressure offer to get started
    #[serde(rename = "S6")]
    SoftCta,
    /// Terminal phase: collecting contact details
    #[serde(rename = "S7")]
    LeadCapture,
}

impl Phase {
    /// All phases in funnel order
    pub const ALL: [Phase; 7] = [
        Phase::Welcome,
        Phase::Discovery,
        Phase::Demo,
        Phase::ValueReinforcement,
        Phase::ObjectionHandling,
        Phase::SoftCta,
        Phase::LeadCapture,
    ];

    /// The phase every session starts in
    pub const INITIAL: Phase = Phase::Welcome;

    /// The phase that ends the funnel
    pub const TERMINAL: Phase = Phase::LeadCapture;

    /// Short machine code ("S1".."S7")
    pub fn code(&self) -> &'static str {
        match self {
            Phase::Welcome => "S1",
            Phase::Discovery => "S2",
            Phase::Demo => "S3",
            Phase::ValueReinforcement => "S4",
            Phase::ObjectionHandling => "S5",
            Phase::SoftCta => "S6",
            Phase::LeadCapture => "S7",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Welcome => "Welcome",
            Phase::Discovery => "Discovery",
            Phase::Demo => "Demo",
            Phase::ValueReinforcement => "Value Reinforcement",
            Phase::ObjectionHandling => "Objection Handling",
            Phase::SoftCta => "Soft Call-to-Action",
            Phase::LeadCapture => "Lead Capture",
        }
    }

    /// Parse a phase code, case-insensitively ("s3" and "S3" are both accepted)
    pub fn from_code(code: &str) -> Result<Phase, OnboardingError> {
        let trimmed = code.trim();
        Phase::ALL
            .iter()
            .copied()
            .find(|phase| phase.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| OnboardingError::UnknownPhase(code.to_string()))
    }

    /// Whether this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        *self == Phase::TERMINAL
    }

    /// Every phase reachable in one step from this one
    pub fn valid_transitions(&self) -> &'static [Phase] {
        match self {
            Phase::Welcome => &[Phase::Discovery],
            Phase::Discovery => &[Phase::Demo, Phase::ObjectionHandling],
            Phase::Demo => &[
                Phase::ValueReinforcement,
                Phase::ObjectionHandling,
                Phase::SoftCta,
            ],
            Phase::ValueReinforcement => &[Phase::ObjectionHandling, Phase::SoftCta],
            Phase::ObjectionHandling => &[Phase::SoftCta],
            // SoftCta -> ValueReinforcement is the only loop-back edge
            Phase::SoftCta => &[Phase::LeadCapture, Phase::ValueReinforcement],
            Phase::LeadCapture => &[],
        }
    }

    /// Check if a direct move to `to` is in the table
    pub fn can_transition_to(&self, to: Phase) -> bool {
        self.valid_transitions().contains(&to)
    }
}

/// Pure lookup into the transition table
pub fn can_transition(from: Phase, to: Phase) -> bool {
    from.can_transition_to(to)
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Phase {
    type Err = OnboardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::from_code(s)
    }
}
