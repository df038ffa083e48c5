//! Heading / body segmentation of a document.
//!
//! A document opens with a run of title lines; the body starts at the first
//! line set in a body size. From then on every line belongs to the body,
//! including titles that appear further down.

use crate::lexer::RawLine;
use crate::markup;

/// Size codes that mark a heading line.
pub const TITLE_SIZES: [u32; 6] = [48, 44, 40, 32, 22, 24];

/// Size codes that open the body.
pub const BODY_START_SIZES: [u32; 3] = [20, 18, 16];

/// Segmenter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentState {
    /// Still inside the opening titles
    #[default]
    Heading,
    /// Past the first body-size line
    Body,
}

/// Body of a document as seen by the overlap policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyText {
    /// Retained lines with their formatting codes, joined by `\n`
    pub raw: String,
    /// Retained lines with codes stripped, blank lines dropped, joined by `\n`
    pub plain: String,
}

impl BodyText {
    /// Length of the cleaned body in characters.
    pub fn char_len(&self) -> usize {
        self.plain.trim().chars().count()
    }
}

/// Two-state machine fed one raw line at a time.
#[derive(Debug, Clone, Default)]
pub struct BodySegmenter {
    state: SegmentState,
}

impl BodySegmenter {
    /// Fresh segmenter in the heading state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SegmentState {
        self.state
    }

    /// Feed a line; returns true when it belongs to the body.
    ///
    /// In the heading state a line carrying a title size is discarded even if
    /// it also carries a body size.
    pub fn feed(&mut self, line: &str) -> bool {
        if self.state == SegmentState::Body {
            return true;
        }

        let mut opens_body = false;
        for size in markup::font_sizes(line) {
            if TITLE_SIZES.contains(&size) {
                return false;
            }
            opens_body |= BODY_START_SIZES.contains(&size);
        }

        if opens_body {
            self.state = SegmentState::Body;
        }
        opens_body
    }
}

/// Run the segmenter over a whole document.
pub fn segment_body(lines: &[RawLine]) -> BodyText {
    let mut segmenter = BodySegmenter::new();
    let mut raw = Vec::new();
    let mut plain = Vec::new();

    for line in lines {
        if !segmenter.feed(&line.text) {
            continue;
        }
        raw.push(line.text.as_str());
        let cleaned = markup::clean_text(&line.text);
        if !cleaned.is_empty() {
            plain.push(cleaned);
        }
    }

    log::trace!(
        "body segment: {} of {} lines retained",
        raw.len(),
        lines.len()
    );

    BodyText {
        raw: raw.join("\n"),
        plain: plain.join("\n"),
    }
}
