//! Compiled pattern tables
//!
//! Detectors are ordered lists of `(label, regex)` pairs compiled once on
//! first use. A pattern that fails to compile is logged and skipped so a bad
//! table entry can never take a detector down.

use regex::Regex;

/// A compiled pattern with the label it reports
pub(crate) struct LabeledPattern {
    pub label: &'static str,
    pub regex: Regex,
}

/// Ordered pattern table
pub(crate) struct PatternTable {
    patterns: Vec<LabeledPattern>,
}

impl PatternTable {
    /// Compile a table; every pattern is made case-insensitive
    pub fn compile(name: &str, table: &[(&'static str, &str)]) -> Self {
        let patterns: Vec<LabeledPattern> = table
            .iter()
            .filter_map(|&(label, pattern)| match Regex::new(&format!("(?i){}", pattern)) {
                Ok(regex) => Some(LabeledPattern { label, regex }),
                Err(e) => {
                    tracing::warn!("Failed to compile {} pattern '{}': {}", name, label, e);
                    None
                }
            })
            .collect();
        tracing::debug!("Compiled {} {} patterns", patterns.len(), name);
        Self { patterns }
    }

    /// Label of the first pattern that matches, in table order
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(text))
            .map(|p| p.label)
    }

    /// Labels of every matching pattern, in table order, without duplicates
    pub fn all_matches(&self, text: &str) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Vec::new();
        for pattern in &self.patterns {
            if !labels.contains(&pattern.label) && pattern.regex.is_match(text) {
                labels.push(pattern.label);
            }
        }
        labels
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.regex.is_match(text))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}
