//! Line classification by formatting cues.
//!
//! Each decoded line is assigned exactly one semantic role. The checks run in
//! a fixed priority order and the first one that matches wins:
//!
//! 1. breadcrumb trail (`\cb1\cf2 ... \par`)
//! 2. green-background runs (`\cb12 ... \par`), pulled out of the line before
//!    the remaining checks look at it
//! 3. footnote anchor (`\chftn`)
//! 4. the first font-size code, looked up in [`category_for_size`]
//!
//! Classification is pure. Footnote numbering and breadcrumb bookkeeping live
//! in [`crate::extractors::footnotes`].

use crate::markup;

/// Semantic role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCategory {
    /// Top-level title (`\fs48`, `\fs44`, `\fs40`, `\fs24`)
    MainTitle,
    /// Second-level title (`\fs32`, `\fs22`)
    SecondTitle,
    /// Lower-level title (`\fs20`)
    MoreTitle,
    /// Emphasised passage (`\fs18`)
    Emphasis,
    /// Body text (`\fs16`)
    NormalText,
    /// Underlined body text (`\fs16` with an underline cue)
    SearchedWords,
    /// Reference or remark (`\fs14`)
    Reference,
    /// Extract-window topic (`\fs10`)
    TopicOfExtract,
    /// Extract-window number (`\fs11`)
    NumberOfExtract,
    /// Breadcrumb trail
    Breadcrumb,
    /// Footnote anchor line
    Footnote,
    /// Line consisting only of green-background runs
    GreenBackground,
    /// No cue matched; the line is dropped
    Unclassified,
}

impl LineCategory {
    /// True for the categories derived from the size table.
    pub fn is_text(self) -> bool {
        !matches!(
            self,
            LineCategory::Breadcrumb
                | LineCategory::Footnote
                | LineCategory::GreenBackground
                | LineCategory::Unclassified
        )
    }
}

/// Outcome of classifying one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// Assigned role
    pub category: LineCategory,
    /// Text with formatting codes stripped and trimmed.
    ///
    /// For breadcrumb lines this is the whole trail, still slash-separated.
    pub text: String,
    /// Green-background runs found on the line, in order
    pub green_runs: Vec<String>,
}

/// Map a raw `\fsN` value to its category.
///
/// `underlined` only matters for body-size text.
///
/// # Examples
///
/// ```
/// use rtf_oxide::layout::{category_for_size, LineCategory};
///
/// assert_eq!(category_for_size(48, false), LineCategory::MainTitle);
/// assert_eq!(category_for_size(16, true), LineCategory::SearchedWords);
/// assert_eq!(category_for_size(12, false), LineCategory::Unclassified);
/// ```
pub fn category_for_size(size: u32, underlined: bool) -> LineCategory {
    match size {
        48 | 44 | 40 | 24 => LineCategory::MainTitle,
        32 | 22 => LineCategory::SecondTitle,
        20 => LineCategory::MoreTitle,
        16 if underlined => LineCategory::SearchedWords,
        16 => LineCategory::NormalText,
        18 => LineCategory::Emphasis,
        14 => LineCategory::Reference,
        10 => LineCategory::TopicOfExtract,
        11 => LineCategory::NumberOfExtract,
        _ => LineCategory::Unclassified,
    }
}

/// Classify a single raw line.
///
/// # Examples
///
/// ```
/// use rtf_oxide::layout::{classify_line, LineCategory};
///
/// let line = classify_line(r"\fs48 Title\par");
/// assert_eq!(line.category, LineCategory::MainTitle);
/// assert_eq!(line.text, "Title");
/// ```
pub fn classify_line(line: &str) -> ClassifiedLine {
    if let Some(trail) = markup::breadcrumb_trail(line) {
        return ClassifiedLine {
            category: LineCategory::Breadcrumb,
            text: markup::clean_text(trail),
            green_runs: Vec::new(),
        };
    }

    let (green_runs, rest) = markup::take_green_runs(line);

    if markup::has_footnote_marker(&rest) {
        return ClassifiedLine {
            category: LineCategory::Footnote,
            text: markup::clean_text(&rest),
            green_runs,
        };
    }

    let category = match markup::font_size(&rest) {
        Some(size) => category_for_size(size, markup::has_underline(&rest)),
        None if !green_runs.is_empty() => LineCategory::GreenBackground,
        None => LineCategory::Unclassified,
    };

    ClassifiedLine {
        category,
        text: markup::clean_text(&rest),
        green_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_table() {
        for size in [48, 44, 40, 24] {
            assert_eq!(category_for_size(size, false), LineCategory::MainTitle);
        }
        assert_eq!(category_for_size(32, false), LineCategory::SecondTitle);
        assert_eq!(category_for_size(22, true), LineCategory::SecondTitle);
        assert_eq!(category_for_size(20, false), LineCategory::MoreTitle);
        assert_eq!(category_for_size(18, false), LineCategory::Emphasis);
        assert_eq!(category_for_size(16, false), LineCategory::NormalText);
        assert_eq!(category_for_size(14, false), LineCategory::Reference);
        assert_eq!(category_for_size(10, false), LineCategory::TopicOfExtract);
        assert_eq!(category_for_size(11, false), LineCategory::NumberOfExtract);
        assert_eq!(category_for_size(36, false), LineCategory::Unclassified);
    }

    #[test]
    fn test_breadcrumb_wins_over_size() {
        let line = classify_line(r"\fs48\cb1\cf2 Book/Part\par");
        assert_eq!(line.category, LineCategory::Breadcrumb);
        assert_eq!(line.text, "Book/Part");
        assert!(line.green_runs.is_empty());
    }

    #[test]
    fn test_green_runs_are_removed_before_sizing() {
        let line = classify_line(r"\fs16 \cb12 see there\par");
        assert_eq!(line.category, LineCategory::NormalText);
        assert_eq!(line.green_runs, vec!["see there"]);
        assert_eq!(line.text, "");
    }

    #[test]
    fn test_green_only_line() {
        let line = classify_line(r"\cb12 cross reference\par");
        assert_eq!(line.category, LineCategory::GreenBackground);
        assert_eq!(line.green_runs, vec!["cross reference"]);
    }

    #[test]
    fn test_footnote_wins_over_size() {
        let line = classify_line(r"\fs16\super\chftn\nosupersub  A note\par");
        assert_eq!(line.category, LineCategory::Footnote);
        assert_eq!(line.text, "A note");
    }

    #[test]
    fn test_underlined_body() {
        let line = classify_line(r"\fs16\ul found\ulnone\par");
        assert_eq!(line.category, LineCategory::SearchedWords);
        assert_eq!(line.text, "found");
    }

    #[test]
    fn test_first_size_code_decides() {
        assert_eq!(
            classify_line(r"\fs14 ref \fs48 big\par").category,
            LineCategory::Reference
        );
    }

    #[test]
    fn test_no_cue() {
        let line = classify_line(r"\pard\qc plain\par");
        assert_eq!(line.category, LineCategory::Unclassified);
        assert!(!line.category.is_text());
    }
}
