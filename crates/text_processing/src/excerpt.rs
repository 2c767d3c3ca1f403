//! Bounded text excerpts for memory and event payloads

use unicode_segmentation::UnicodeSegmentation;

const ELLIPSIS: &str = "…";

/// Collapse whitespace and cut to at most `max_graphemes` grapheme clusters
///
/// Truncated excerpts end with an ellipsis that counts toward the limit, so
/// the result never exceeds `max_graphemes` clusters.
pub fn truncate_excerpt(text: &str, max_graphemes: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if max_graphemes == 0 {
        return String::new();
    }

    let graphemes: Vec<&str> = normalized.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return normalized;
    }

    let mut excerpt: String = graphemes[..max_graphemes - 1].concat();
    excerpt.truncate(excerpt.trim_end().len());
    excerpt.push_str(ELLIPSIS);
    excerpt
}
