//! Cross-document overlap stitching.
//!
//! Consecutive documents of a book are often cut mid-passage. A document
//! may borrow the last characters of its predecessor and the first
//! characters of its successor so that each record reads on its own. Four
//! predicates suppress this for documents that start a new unit of text.

use crate::layout::BodyText;
use crate::markup;

/// Characters carried in a head or tail window.
pub const OVERLAP_WINDOW_CHARS: usize = 100;

/// A colored opening only blocks trailing context below this body length.
pub const COLORED_OPENING_MIN_BODY_CHARS: usize = 300;

/// Works whose documents never borrow context.
pub const NO_OVERLAP_TITLES: &[&str] = &[
    "תניא",
    "קונטרס ומעין",
    "אגרות קודש",
    "אדמו\"ר ה\"צמח צדק\" ותנועת ה\"השכלה\"",
    "תורת מנחם",
    "מאמרים מלוקטים",
    "היום יום",
    "לקוטי טעמים ומנהגים להגדה של פסח",
];

/// Phrases that open a self-contained discourse.
pub const NO_OVERLAP_OPENINGS: &[&str] = &["ב\"ה", "והנה", "להבין", "וביאור הענין"];

/// Size codes on the first line that mark a document starting with a title.
pub const LARGE_TITLE_SIZES: [u32; 8] = [48, 44, 40, 24, 32, 22, 20, 18];

/// Bounded slice of a document's head or tail text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapWindow(String);

impl OverlapWindow {
    /// First [`OVERLAP_WINDOW_CHARS`] characters of `text`.
    pub fn head(text: &str) -> Self {
        Self(text.trim_start().chars().take(OVERLAP_WINDOW_CHARS).collect())
    }

    /// Last [`OVERLAP_WINDOW_CHARS`] characters of `text`.
    pub fn tail(text: &str) -> Self {
        let text = text.trim_end();
        let skip = text.chars().count().saturating_sub(OVERLAP_WINDOW_CHARS);
        Self(text.chars().skip(skip).collect())
    }

    /// Window contents.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when there is no context to share.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The four suppression predicates of one document, plus its body length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapSignals {
    /// A breadcrumb names a protected work
    pub no_overlap_title: bool,
    /// The body opens with a protected phrase
    pub no_overlap_opening: bool,
    /// The body carries the pink-on-blue marker pair
    pub colored_opening: bool,
    /// The first line is set in a large size
    pub large_title_at_start: bool,
    /// Cleaned body length in characters
    pub body_chars: usize,
}

impl OverlapSignals {
    /// Evaluate the predicates for a document.
    pub fn evaluate(breadcrumbs: &[String], body: &BodyText, first_line: Option<&str>) -> Self {
        Self {
            no_overlap_title: has_protected_title(breadcrumbs),
            no_overlap_opening: has_protected_opening(&body.plain),
            colored_opening: markup::has_colored_opening(&body.raw),
            large_title_at_start: first_line.is_some_and(starts_with_large_title),
            body_chars: body.char_len(),
        }
    }

    /// True when any predicate holds.
    pub fn any(&self) -> bool {
        self.no_overlap_title
            || self.no_overlap_opening
            || self.colored_opening
            || self.large_title_at_start
    }
}

/// True when a breadcrumb contains a protected title, spaced or hyphenated.
pub fn has_protected_title(breadcrumbs: &[String]) -> bool {
    NO_OVERLAP_TITLES.iter().any(|title| {
        let hyphenated = title.replace(' ', "-");
        breadcrumbs
            .iter()
            .any(|crumb| crumb.contains(title) || crumb.contains(&hyphenated))
    })
}

/// True when the trimmed body starts with a protected opening phrase.
pub fn has_protected_opening(body: &str) -> bool {
    let body = body.trim();
    NO_OVERLAP_OPENINGS
        .iter()
        .any(|opening| body.starts_with(opening))
}

/// True when the line carries a large size code.
pub fn starts_with_large_title(first_line: &str) -> bool {
    markup::font_sizes(first_line).any(|size| LARGE_TITLE_SIZES.contains(&size))
}

/// Neighbour context available to one document.
#[derive(Debug, Clone, Copy, Default)]
pub struct StitchContext<'a> {
    /// Tail window of the previous document (empty when none)
    pub previous_tail: &'a str,
    /// Head window of the next document (empty when none)
    pub next_head: &'a str,
    /// The document starts a run of duplicates
    pub first_in_book: bool,
    /// The document is flagged duplicate of either neighbour
    pub is_duplicate: bool,
}

/// Which neighbour context a document receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitchDecision {
    /// Previous tail before the text, next head after it
    Both,
    /// Next head after the text only
    Trailing,
    /// Text used as is
    Suppressed,
}

/// Decide how a document is stitched.
pub fn decide(signals: &OverlapSignals, ctx: &StitchContext<'_>) -> StitchDecision {
    if !signals.any() && !ctx.first_in_book {
        return StitchDecision::Both;
    }
    if signals.no_overlap_title {
        return StitchDecision::Suppressed;
    }
    if signals.colored_opening && signals.body_chars < COLORED_OPENING_MIN_BODY_CHARS {
        return StitchDecision::Suppressed;
    }
    if ctx.next_head.is_empty() || ctx.is_duplicate {
        return StitchDecision::Suppressed;
    }
    StitchDecision::Trailing
}

/// Join the non-empty parts with newlines.
///
/// # Examples
///
/// ```
/// use rtf_oxide::pipeline::overlap::join_text;
///
/// assert_eq!(join_text(&["tail", "", "body"]), "tail\nbody");
/// ```
pub fn join_text(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply the overlap policy to a document's text.
///
/// Returns the decision taken and the effective text.
pub fn stitch(
    text: &str,
    signals: &OverlapSignals,
    ctx: &StitchContext<'_>,
) -> (StitchDecision, String) {
    let decision = decide(signals, ctx);
    let stitched = match decision {
        StitchDecision::Both => join_text(&[ctx.previous_tail, text, ctx.next_head]),
        StitchDecision::Trailing => join_text(&[text, ctx.next_head]),
        StitchDecision::Suppressed => text.to_string(),
    };
    (decision, stitched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(plain: &str) -> BodyText {
        BodyText {
            raw: format!(r"\fs16 {}\par", plain),
            plain: plain.to_string(),
        }
    }

    #[test]
    fn test_windows_are_bounded() {
        let text: String = "א".repeat(250);
        assert_eq!(OverlapWindow::head(&text).as_str().chars().count(), 100);
        assert_eq!(OverlapWindow::tail(&text).as_str().chars().count(), 100);

        let short = "short text";
        assert_eq!(OverlapWindow::head(short).as_str(), short);
        assert_eq!(OverlapWindow::tail(short).as_str(), short);
        assert!(OverlapWindow::head("").is_empty());
    }

    #[test]
    fn test_tail_takes_the_end() {
        let text = format!("{}END", "x".repeat(200));
        assert!(OverlapWindow::tail(&text).as_str().ends_with("END"));
        assert!(OverlapWindow::head(&text).as_str().starts_with('x'));
    }

    #[test]
    fn test_protected_title_forms() {
        assert!(has_protected_title(&["ספרים/תורת מנחם/חלק א".to_string()]));
        assert!(has_protected_title(&["תורת-מנחם".to_string()]));
        assert!(!has_protected_title(&["ספר אחר".to_string()]));
        assert!(!has_protected_title(&[]));
    }

    #[test]
    fn test_protected_opening() {
        assert!(has_protected_opening("  והנה מבואר"));
        assert!(has_protected_opening("ב\"ה\nשלום"));
        assert!(!has_protected_opening("מבואר והנה"));
    }

    #[test]
    fn test_large_title_at_start() {
        assert!(starts_with_large_title(r"\pard\fs32 Title\par"));
        assert!(!starts_with_large_title(r"\pard\fs16 Body\par"));
    }

    #[test]
    fn test_signals_from_body() {
        let mut text = body("והנה");
        text.raw = format!(r"\cf2\cb10 {}", text.raw);
        let signals = OverlapSignals::evaluate(&[], &text, Some(r"\fs16 x\par"));
        assert!(signals.no_overlap_opening);
        assert!(signals.colored_opening);
        assert!(!signals.large_title_at_start);
        assert_eq!(signals.body_chars, 4);
    }

    #[test]
    fn test_unsuppressed_stitches_both_ways() {
        let ctx = StitchContext {
            previous_tail: "prev",
            next_head: "next",
            ..Default::default()
        };
        let (decision, text) = stitch("body", &OverlapSignals::default(), &ctx);
        assert_eq!(decision, StitchDecision::Both);
        assert_eq!(text, "prev\nbody\nnext");
    }

    #[test]
    fn test_first_in_book_only_gets_trailing() {
        let ctx = StitchContext {
            previous_tail: "prev",
            next_head: "next",
            first_in_book: true,
            is_duplicate: false,
        };
        let (decision, text) = stitch("body", &OverlapSignals::default(), &ctx);
        assert_eq!(decision, StitchDecision::Trailing);
        assert_eq!(text, "body\nnext");
    }

    #[test]
    fn test_duplicate_pair_gets_nothing() {
        let ctx = StitchContext {
            previous_tail: "prev",
            next_head: "next",
            first_in_book: true,
            is_duplicate: true,
        };
        assert_eq!(
            decide(&OverlapSignals::default(), &ctx),
            StitchDecision::Suppressed
        );
    }

    #[test]
    fn test_trailing_duplicate_with_title_gets_nothing() {
        let signals = OverlapSignals {
            large_title_at_start: true,
            ..Default::default()
        };
        let ctx = StitchContext {
            previous_tail: "prev",
            next_head: "next",
            first_in_book: false,
            is_duplicate: true,
        };
        let (decision, text) = stitch("body", &signals, &ctx);
        assert_eq!(decision, StitchDecision::Suppressed);
        assert_eq!(text, "body");
    }

    #[test]
    fn test_protected_title_blocks_everything() {
        let signals = OverlapSignals {
            no_overlap_title: true,
            ..Default::default()
        };
        let ctx = StitchContext {
            previous_tail: "prev",
            next_head: "next",
            ..Default::default()
        };
        assert_eq!(stitch("body", &signals, &ctx).1, "body");
    }

    #[test]
    fn test_no_neighbours_is_identity() {
        let signals = OverlapSignals::default();
        let (_, text) = stitch("body", &signals, &StitchContext::default());
        assert_eq!(text, "body");
    }
}
