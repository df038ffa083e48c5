//! Footnote and breadcrumb extraction.
//!
//! Footnote anchors and breadcrumb trails are pulled out of the line stream
//! ahead of size-based classification. Footnotes are numbered `F1`, `F2`, ...
//! per document; a fresh [`FootnoteExtractor`] is created for every document.

use crate::markup;
use crate::record::{FootnoteRecord, Position};

/// Characters of the referenced line kept as its snippet.
pub const SNIPPET_CHARS: usize = 60;

/// Level assigned to every footnote.
pub const DEFAULT_FOOTNOTE_LEVEL: u32 = 1;

/// Type assigned to every footnote.
pub const DEFAULT_FOOTNOTE_TYPE: &str = "General";

/// Per-document footnote state.
#[derive(Debug, Clone)]
pub struct FootnoteExtractor {
    /// Footnotes issued so far
    issued: usize,
    /// Current 1-based page
    page: usize,
    /// Text lines seen so far
    text_lines: usize,
    /// Most recent text line
    last_text: Option<String>,
}

impl Default for FootnoteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FootnoteExtractor {
    /// Start a document: no footnotes issued, page 1.
    pub fn new() -> Self {
        Self {
            issued: 0,
            page: 1,
            text_lines: 0,
            last_text: None,
        }
    }

    /// Number of footnotes issued in this document.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// Current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Remember a classified text line as the target of following footnotes.
    pub fn note_text_line(&mut self, text: &str) {
        self.text_lines += 1;
        self.last_text = Some(text.to_string());
    }

    /// Account for the hard page breaks on a line once it has been handled.
    pub fn finish_line(&mut self, raw: &str) {
        self.page += markup::page_breaks(raw);
    }

    /// Issue the next footnote.
    pub fn footnote(&mut self, paragraph: usize, content: String) -> FootnoteRecord {
        self.issued += 1;

        let snippet = self
            .last_text
            .as_deref()
            .map(|text| text.chars().take(SNIPPET_CHARS).collect())
            .unwrap_or_default();

        FootnoteRecord {
            footnote_id: format!("F{}", self.issued),
            footnote_level: DEFAULT_FOOTNOTE_LEVEL,
            footnote_type: DEFAULT_FOOTNOTE_TYPE.to_string(),
            referenced_text_id: format!("T{}", self.text_lines),
            referenced_text_snippet: snippet,
            footnote_content: content,
            position: Position {
                page: self.page,
                paragraph,
            },
            contextual_tags: vec!["footnote".to_string()],
        }
    }
}

/// Ordered, trimmed breadcrumb segments of a cleaned trail.
///
/// # Examples
///
/// ```
/// use rtf_oxide::extractors::footnotes::breadcrumbs;
///
/// assert_eq!(breadcrumbs("Crumb A/Crumb B"), vec!["Crumb A", "Crumb B"]);
/// ```
pub fn breadcrumbs(trail: &str) -> Vec<String> {
    markup::split_breadcrumbs(trail)
}
