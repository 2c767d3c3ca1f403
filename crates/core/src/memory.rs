//! Conversation Memory
//!
//! Facts extracted from a session's user messages. Collections only grow:
//! entries are appended if absent and never removed or reordered. The memory
//! is dropped together with its session.

use serde::{Deserialize, Serialize};

/// Outcome of the latest call-to-action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CtaStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl CtaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CtaStatus::Pending => "pending",
            CtaStatus::Accepted => "accepted",
            CtaStatus::Declined => "declined",
        }
    }
}

/// Contact details captured in the terminal phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LeadDetails {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl LeadDetails {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.name.is_none()
    }

    /// Fill fields that are still missing from `other`; existing values win
    pub fn merge(&mut self, other: LeadDetails) {
        if self.email.is_none() {
            self.email = other.email;
        }
        if self.phone.is_none() {
            self.phone = other.phone;
        }
        if self.name.is_none() {
            self.name = other.name;
        }
    }
}

/// Per-session memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConversationMemory {
    pain_points: Vec<String>,
    frameworks: Vec<String>,
    objections: Vec<String>,
    cta_status: CtaStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    lead: Option<LeadDetails>,
}

fn push_distinct(list: &mut Vec<String>, value: &str) -> bool {
    if list.iter().any(|existing| existing == value) {
        false
    } else {
        list.push(value.to_string());
        true
    }
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pain_points(&self) -> &[String] {
        &self.pain_points
    }

    pub fn frameworks(&self) -> &[String] {
        &self.frameworks
    }

    pub fn objections(&self) -> &[String] {
        &self.objections
    }

    pub fn cta_status(&self) -> CtaStatus {
        self.cta_status
    }

    pub fn lead(&self) -> Option<&LeadDetails> {
        self.lead.as_ref()
    }

    /// Add a pain-point label; returns false if it was already present
    pub fn add_pain_point(&mut self, label: &str) -> bool {
        push_distinct(&mut self.pain_points, label)
    }

    /// Add a framework label; returns false if it was already present
    pub fn add_framework(&mut self, label: &str) -> bool {
        push_distinct(&mut self.frameworks, label)
    }

    /// Add an objection excerpt; returns false if it was already present
    pub fn add_objection(&mut self, excerpt: &str) -> bool {
        push_distinct(&mut self.objections, excerpt)
    }

    pub fn set_cta_status(&mut self, status: CtaStatus) {
        self.cta_status = status;
    }

    /// Merge lead fields. Only the session may call this, once it is in the
    /// terminal phase.
    pub(crate) fn merge_lead(&mut self, details: LeadDetails) {
        match self.lead.as_mut() {
            Some(lead) => lead.merge(details),
            None => self.lead = Some(details),
        }
    }

    /// Whether anything worth rendering into a prompt has been recorded
    pub fn is_empty(&self) -> bool {
        self.pain_points.is_empty() && self.frameworks.is_empty() && self.objections.is_empty()
    }
}
