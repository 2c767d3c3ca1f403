//! Contact-field extraction for the lead-capture phase

use once_cell::sync::Lazy;
use regex::Regex;

use onboarding_core::LeadDetails;

struct LeadPatterns {
    email: Regex,
    phone: Regex,
    name: Regex,
}

static LEAD: Lazy<Option<LeadPatterns>> = Lazy::new(|| {
    let compiled = (|| {
        Ok::<_, regex::Error>(LeadPatterns {
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}")?,
            // Grouped digits (area code, exchange, line) or one unbroken run
            phone: Regex::new(
                r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{2,4}\)\s?|\b\d{2,4}[\s.-])\d{3,4}[\s.-]\d{3,4}\b|\+?\b\d{10,15}\b",
            )?,
            name: Regex::new(
                r"(?i:\bmy name is|\bi am|\bi'm)\s+([A-Z][A-Za-z'-]+(?:\s+[A-Z][A-Za-z'-]+)?)",
            )?,
        })
    })();
    compiled
        .map_err(|e| tracing::warn!("Failed to compile lead patterns: {}", e))
        .ok()
});

/// Pull email, phone and name out of a user message
///
/// Returns an empty `LeadDetails` when nothing is found.
pub fn extract_lead_details(text: &str) -> LeadDetails {
    let Some(patterns) = LEAD.as_ref() else {
        return LeadDetails::default();
    };

    let email = patterns
        .email
        .find(text)
        .map(|m| m.as_str().to_ascii_lowercase());

    // Phone digits only count when they are not part of the email
    let without_email = patterns.email.replace_all(text, " ");
    let phone = patterns
        .phone
        .find(&without_email)
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| p.chars().filter(|c| c.is_ascii_digit()).count() >= 7);

    let name = patterns
        .name
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    LeadDetails { email, phone, name }
}
