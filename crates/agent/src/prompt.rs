//! Prompt fragment builder
//!
//! Renders the current phase and conversation memory into an instruction
//! block for the external generator. Output depends only on the inputs.

use std::fmt::Write;

use onboarding_core::{ConversationMemory, CtaStatus, Phase};
use onboarding_text_processing::directive_token;

/// What the generator should achieve in a phase
pub fn phase_goal(phase: Phase) -> &'static str {
    match phase {
        Phase::Welcome => "Greet the visitor warmly and ask what brought them here today.",
        Phase::Discovery => {
            "Ask open questions to learn which compliance frameworks they are working toward and where the work hurts."
        }
        Phase::Demo => {
            "Show how the product solves the problems they described, using a concrete example."
        }
        Phase::ValueReinforcement => {
            "Tie the demo back to their pain points and summarise the time and risk it removes."
        }
        Phase::ObjectionHandling => {
            "Address their concern with empathy and specifics. Do not be pushy."
        }
        Phase::SoftCta => {
            "Offer a low-pressure next step, such as setting up a workspace, and accept a no gracefully."
        }
        Phase::LeadCapture => {
            "Thank them and ask for the contact details needed to follow up: name and work email."
        }
    }
}

/// Behaviour the generator must avoid in a phase
pub fn phase_constraints(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Welcome => &["Do not pitch features before you know their needs."],
        Phase::Discovery => &["Do not quote prices.", "Ask one question at a time."],
        Phase::Demo => &["Keep examples tied to what they told you."],
        Phase::ValueReinforcement => &["Do not introduce new features."],
        Phase::ObjectionHandling => &["Do not dismiss or argue with the concern."],
        Phase::SoftCta => &["Do not repeat the offer more than once."],
        Phase::LeadCapture => &["Ask only for the details listed in the goal."],
    }
}

/// Render the instruction block for `phase` with the non-empty parts of `memory`
pub fn build_prompt_fragment(phase: Phase, memory: &ConversationMemory) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## Current phase: {} ({})", phase.label(), phase.code());
    let _ = writeln!(out, "Goal: {}", phase_goal(phase));
    for rule in phase_constraints(phase) {
        let _ = writeln!(out, "- {}", rule);
    }
    if !phase.is_terminal() {
        let _ = writeln!(
            out,
            "- Do not request contact information (name, email, phone) in this phase."
        );
    }

    let next = phase.valid_transitions();
    if next.is_empty() {
        let _ = writeln!(out, "\nThis is the final phase. Do not emit phase directives.");
    } else {
        let _ = writeln!(
            out,
            "\nWhen the conversation is ready to move on, end your reply with exactly one of:"
        );
        for target in next {
            let _ = writeln!(out, "- {} {}", directive_token(*target), target.label());
        }
    }

    let memory_lines = render_memory(memory);
    if !memory_lines.is_empty() {
        let _ = writeln!(out, "\n## What we know so far");
        for line in memory_lines {
            let _ = writeln!(out, "{}", line);
        }
    }

    out
}

fn render_memory(memory: &ConversationMemory) -> Vec<String> {
    let mut lines = Vec::new();
    if !memory.pain_points().is_empty() {
        lines.push(format!("Pain points: {}", memory.pain_points().join(", ")));
    }
    if !memory.frameworks().is_empty() {
        lines.push(format!("Frameworks: {}", memory.frameworks().join(", ")));
    }
    if !memory.objections().is_empty() {
        let quoted: Vec<String> = memory
            .objections()
            .iter()
            .map(|o| format!("\"{}\"", o))
            .collect();
        lines.push(format!("Prior objections: {}", quoted.join("; ")));
    }
    if memory.cta_status() != CtaStatus::Pending {
        lines.push(format!("Call-to-action: {}", memory.cta_status().as_str()));
    }
    lines
}
