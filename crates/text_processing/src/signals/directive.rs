//! Explicit phase directives embedded in generated text
//!
//! The generator is prompted to append a token such as `[PHASE:S3]` when it
//! decides the conversation should move on. A directive, when present,
//! overrides every heuristic for that reply.

use once_cell::sync::Lazy;
use regex::Regex;

use onboarding_core::Phase;

static DIRECTIVE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)\[\s*PHASE\s*:\s*(S[1-7])\s*\]")
        .map_err(|e| tracing::warn!("Failed to compile directive pattern: {}", e))
        .ok()
});

/// Render the directive token for a phase
pub fn directive_token(phase: Phase) -> String {
    format!("[PHASE:{}]", phase.code())
}

/// First directive in `text`, if any
pub fn detect_directive(text: &str) -> Option<Phase> {
    let regex = DIRECTIVE.as_ref()?;
    let code = regex.captures(text)?.get(1)?.as_str();
    Phase::from_code(code).ok()
}

/// Remove every directive token, e.g. before showing the reply to the user
pub fn strip_directives(text: &str) -> String {
    match DIRECTIVE.as_ref() {
        Some(regex) => regex.replace_all(text, "").trim().to_string(),
        None => text.trim().to_string(),
    }
}
