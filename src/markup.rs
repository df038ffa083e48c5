//! Formatting cues read from decoded markup lines.
//!
//! The classifier never renders anything; it only asks a line a handful of
//! questions (which font size, which colour pair, is there a footnote or
//! underline marker) and strips the codes once the answer is known.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;

lazy_static! {
    /// First font-size code on a line
    static ref RE_FONT_SIZE: Regex = Regex::new(r"\\fs(\d+)").unwrap();

    /// Yellow background + pink foreground run closed by a paragraph break
    static ref RE_BREADCRUMB: Regex = Regex::new(r"\\cb1\\cf2([^0-9].*?)\\par\b").unwrap();

    /// Green background run closed by a paragraph break
    static ref RE_GREEN_BACKGROUND: Regex = Regex::new(r"\\cb12([^0-9].*?)\\par\b").unwrap();

    /// Footnote anchor
    static ref RE_FOOTNOTE: Regex = Regex::new(r"\\chftn\b").unwrap();

    /// Pink foreground on blue background
    static ref RE_COLORED_OPENING: Regex = Regex::new(r"\\cf2\\cb10\b").unwrap();

    /// Hard page break
    static ref RE_PAGE_BREAK: Regex = Regex::new(r"\\page\b").unwrap();

    /// Any control word with its parameter
    static ref RE_CONTROL_WORD: Regex = Regex::new(r"\\([a-zA-Z]+)(-?\d+)?").unwrap();

    /// Escapes, control words (with delimiter space) and stray control symbols
    static ref RE_CODE: Regex =
        Regex::new(r"\\(?:([\\{}])|[a-zA-Z]+(?:-?\d+)? ?|[^a-zA-Z\\{}])?").unwrap();
}

/// Underline style words; `\ulnone`, `\ulc` and `\ul0` do not underline.
const UNDERLINE_WORDS: &[&str] = &[
    "ul", "uld", "uldash", "uldashd", "uldashdd", "uldb", "ulhwave", "ulldash", "ulth", "ulthd",
    "ulthdash", "ulthdashd", "ulthdashdd", "ulthldash", "ululdbwave", "ulw", "ulwave",
];

/// Font-size code of the first `\fsN` on the line, in the units it is written in.
///
/// # Examples
///
/// ```
/// use rtf_oxide::markup::font_size;
///
/// assert_eq!(font_size(r"\b\fs48 Title\par"), Some(48));
/// assert_eq!(font_size(r"no codes"), None);
/// ```
pub fn font_size(line: &str) -> Option<u32> {
    RE_FONT_SIZE
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}

/// Every font-size code on the line, in order.
pub fn font_sizes(line: &str) -> impl Iterator<Item = u32> + '_ {
    RE_FONT_SIZE
        .captures_iter(line)
        .filter_map(|caps| caps[1].parse().ok())
}

/// Slash-separated breadcrumb trail carried by the line, if any.
pub fn breadcrumb_trail(line: &str) -> Option<&str> {
    RE_BREADCRUMB
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split a breadcrumb trail into ordered, trimmed segments.
///
/// Empty segments are kept so that `Breadcrumb i` always names the i-th
/// segment of the source.
pub fn split_breadcrumbs(trail: &str) -> Vec<String> {
    trail.split('/').map(clean_text).collect()
}

/// Pull green-background runs out of a line.
///
/// Returns the cleaned text of each run (empty runs dropped) and the line
/// with the runs removed.
pub fn take_green_runs(line: &str) -> (Vec<String>, Cow<'_, str>) {
    if !RE_GREEN_BACKGROUND.is_match(line) {
        return (Vec::new(), Cow::Borrowed(line));
    }
    let runs = RE_GREEN_BACKGROUND
        .captures_iter(line)
        .map(|caps| clean_text(&caps[1]))
        .filter(|run| !run.is_empty())
        .collect();
    (runs, RE_GREEN_BACKGROUND.replace_all(line, ""))
}

/// True when the line carries a footnote anchor.
pub fn has_footnote_marker(line: &str) -> bool {
    RE_FOOTNOTE.is_match(line)
}

/// True when the line switches underlining on.
pub fn has_underline(line: &str) -> bool {
    if line.contains("Underline") {
        return true;
    }
    RE_CONTROL_WORD.captures_iter(line).any(|caps| {
        let name = &caps[1];
        let off = caps.get(2).is_some_and(|p| p.as_str() == "0");
        UNDERLINE_WORDS.contains(&name) && !off
    })
}

/// True when the text contains the pink-on-blue marker pair.
pub fn has_colored_opening(text: &str) -> bool {
    RE_COLORED_OPENING.is_match(text)
}

/// Number of hard page breaks on the line.
pub fn page_breaks(line: &str) -> usize {
    RE_PAGE_BREAK.find_iter(line).count()
}

/// Remove every formatting code, keeping escaped literals.
///
/// # Examples
///
/// ```
/// use rtf_oxide::markup::strip_codes;
///
/// assert_eq!(strip_codes(r"\b\fs32 Bold\b0  text\par"), "Bold text");
/// assert_eq!(strip_codes(r"a \{b\} \\c"), r"a {b} \c");
/// ```
pub fn strip_codes(line: &str) -> String {
    RE_CODE
        .replace_all(line, |caps: &Captures<'_>| {
            caps.get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Strip codes and trim surrounding whitespace.
pub fn clean_text(line: &str) -> String {
    strip_codes(line).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_first_code_wins() {
        assert_eq!(font_size(r"\fs16 a \fs48 b"), Some(16));
        assert_eq!(font_size(r"\f0\fs22\cf1 heading"), Some(22));
        assert_eq!(font_sizes(r"\fs16 a \fs48 b").collect::<Vec<_>>(), vec![16, 48]);
    }

    #[test]
    fn test_breadcrumb_trail() {
        assert_eq!(breadcrumb_trail(r"\cb1\cf2Crumb A/Crumb B\par"), Some("Crumb A/Crumb B"));
        assert_eq!(breadcrumb_trail(r"\cb1\cf2 Part/Chapter\par"), Some(" Part/Chapter"));
        assert_eq!(breadcrumb_trail(r"\cb12\cf2 green\par"), None);
        assert_eq!(breadcrumb_trail(r"\cb1\cf2 no break"), None);
        assert_eq!(breadcrumb_trail(r"\cb1\cf2 x\pard"), None);
    }

    #[test]
    fn test_split_breadcrumbs_preserves_order() {
        assert_eq!(
            split_breadcrumbs(" Book / Part 1 /Chapter 3 "),
            vec!["Book", "Part 1", "Chapter 3"]
        );
        assert_eq!(split_breadcrumbs("a//b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_take_green_runs() {
        let (runs, rest) = take_green_runs(r"\fs16 \cb12 see note\par");
        assert_eq!(runs, vec!["see note"]);
        assert_eq!(rest, r"\fs16 ");

        let (runs, rest) = take_green_runs(r"\fs16 plain\par");
        assert!(runs.is_empty());
        assert!(matches!(rest, Cow::Borrowed(_)));
    }

    #[test]
    fn test_footnote_marker() {
        assert!(has_footnote_marker(r"{\super\chftn} note\par"));
        assert!(has_footnote_marker(r"\chftn"));
        assert!(!has_footnote_marker(r"\chftnsep\par"));
    }

    #[test]
    fn test_underline_detection() {
        assert!(has_underline(r"\fs16\ul word\ulnone\par"));
        assert!(has_underline(r"\fs16\uldb word\par"));
        assert!(has_underline("\\fs16 Underline word"));
        assert!(!has_underline(r"\fs16\ul0 word\par"));
        assert!(!has_underline(r"\fs16\ulnone word\par"));
        assert!(!has_underline(r"\fs16 plain\par"));
    }

    #[test]
    fn test_colored_opening() {
        assert!(has_colored_opening(r"\fs16\cf2\cb10 opening"));
        assert!(!has_colored_opening(r"\fs16\cf2\cb1 opening"));
        assert!(!has_colored_opening(r"\fs16\cf2\cb100 opening"));
    }

    #[test]
    fn test_page_breaks() {
        assert_eq!(page_breaks(r"\page\fs16 a\page b\par"), 2);
        assert_eq!(page_breaks(r"\pagebb a\par"), 0);
    }

    #[test]
    fn test_strip_codes() {
        assert_eq!(strip_codes(r"\fs48 Title\par"), "Title");
        assert_eq!(strip_codes(r"\cf2Crumb"), "Crumb");
        assert_eq!(strip_codes(r"\li-360 indented\par"), "indented");
        assert_eq!(strip_codes(r"\\fs12"), r"\fs12");
        assert_eq!(strip_codes("trailing\\"), "trailing");
    }

    #[test]
    fn test_clean_text_trims() {
        assert_eq!(clean_text(r"  \fs16  Body text \par"), "Body text");
    }
}
