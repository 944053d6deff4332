// src/services/signature.rs

//! Whole-page signature service.
//!
//! Page-level only: never attempts structured extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::models::{ExtractionConfig, PageSignature};
use crate::utils::text::{char_len, sha256_hex, stripped_text, truncate, visible_text};

static PREVIEW_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article, div, li").expect("static selector is valid"));

/// Service for computing a content signature of a whole page.
#[derive(Debug, Clone, Default)]
pub struct SignatureExtractor {
    config: ExtractionConfig,
}

impl SignatureExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, content: &str) -> PageSignature {
        let document = Html::parse_document(content);
        let cleaned = self.cleaned_text(&document);

        PageSignature {
            signature: sha256_hex(&cleaned),
            preview: self.preview(&document),
            content_length: char_len(&cleaned),
        }
    }

    /// Visible text, keeping only trimmed lines long enough to carry content.
    ///
    /// Short lines (menus, counters, timestamps) are dropped so they do not
    /// flip the signature.
    fn cleaned_text(&self, document: &Html) -> String {
        visible_text(document.root_element())
            .lines()
            .map(str::trim)
            .filter(|line| char_len(line) > self.config.min_line_chars)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn preview(&self, document: &Html) -> Vec<String> {
        document
            .select(&PREVIEW_BLOCKS)
            .take(self.config.preview_scan_limit)
            .map(|el| truncate(&stripped_text(el), self.config.preview_snippet_chars))
            .filter(|text| char_len(text) > self.config.preview_min_chars)
            .take(self.config.max_previews)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "<p>hello world this is long enough text here</p>";

    #[test]
    fn test_identical_pages_share_signature() {
        let extractor = SignatureExtractor::default();
        let page = "<p>hello world this is long enough text here</p>";

        let a = extractor.extract(page);
        let b = extractor.extract(page);
        assert_eq!(a.signature, b.signature);
        assert_eq!(a.signature.len(), 64);
        assert_eq!(a.content_length, 41);
    }

    #[test]
    fn test_short_lines_do_not_affect_signature() {
        let extractor = SignatureExtractor::default();
        let a = extractor.extract(&format!("{BODY}\n<span>3 min</span>"));
        let b = extractor.extract(&format!("{BODY}\n<span>4 min</span>"));
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_scripts_excluded() {
        let extractor = SignatureExtractor::default();
        let script = |build: &str| format!("{BODY}<script>\nvar build = '{build}';\n</script>");
        let a = extractor.extract(&script("aaaaaaaaaaaa"));
        let b = extractor.extract(&script("bbbbbbbbbbbb"));
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_content_change_changes_signature() {
        let extractor = SignatureExtractor::default();
        let a = extractor.extract("<p>the first announcement of the season</p>");
        let b = extractor.extract("<p>the second announcement of the season</p>");
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_preview_limits() {
        let long = "a long enough block of descriptive text for a preview snippet ".repeat(5);
        let page = format!(
            "<div>short</div>{}",
            (0..6).map(|_| format!("<li>{long}</li>")).collect::<String>()
        );
        let sig = SignatureExtractor::default().extract(&page);

        // first 5 blocks scanned, the short one dropped, at most 3 kept
        assert_eq!(sig.preview.len(), 3);
        assert!(sig.preview.iter().all(|p| p.chars().count() <= 200));
    }
}
