//! Core error types
//!
//! Guardrail rejections are not errors; they are reported as events. These
//! variants cover integration mistakes only.

use thiserror::Error;

use crate::Phase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    #[error("Session {0} has an empty phase history")]
    EmptyHistory(String),

    #[error("Lead details can only be recorded in the terminal phase (session is in {0})")]
    LeadOutsideTerminalPhase(Phase),
}

pub type Result<T> = std::result::Result<T, OnboardingError>;
