// src/utils/text.rs

//! Text helpers shared by extraction and reporting.

use scraper::ElementRef;
use sha2::{Digest, Sha256};
use unicode_segmentation::UnicodeSegmentation;

/// Elements whose text is never visible on the page.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

const ELLIPSIS: &str = "...";

/// Collect the text of an element, skipping script and style subtrees.
///
/// Text nodes are concatenated without separators, so line breaks from the
/// source document are kept.
pub fn visible_text(element: ElementRef<'_>) -> String {
    text_nodes(element).concat()
}

/// Visible text nodes, each trimmed, empty ones dropped, joined by a space.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    text_nodes(element)
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_nodes(element: ElementRef<'_>) -> Vec<&str> {
    let mut out = Vec::new();
    collect_text(element, &mut out);
    out
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(&**text);
        } else if let Some(child_elem) = ElementRef::wrap(child) {
            if !HIDDEN_ELEMENTS.contains(&child_elem.value().name()) {
                collect_text(child_elem, out);
            }
        }
    }
}

/// Collapse every whitespace run (including newlines) into a single space.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of user-perceived characters.
pub fn char_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Keep at most `max` characters.
pub fn truncate(s: &str, max: usize) -> String {
    s.graphemes(true).take(max).collect()
}

/// Keep at most `max` characters, marking the cut with `...` inside the budget.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if char_len(s) <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = truncate(s, keep).trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Lowercase hex SHA-256 of the given text.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
