//! Exact-duplicate detection between adjacent documents.
//!
//! Two documents are duplicates when their extracted content serializes to
//! the same comparison key (see [`crate::record::DocumentRecord::comparison_key`]).
//! Only neighbours in file order are ever compared.

/// Duplicate annotations of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateFlags {
    /// Equal to its predecessor or successor
    pub is_duplicate: bool,
    /// Duplicate whose predecessor is not
    pub first_in_book: bool,
}

impl DuplicateFlags {
    /// Flags for a document given its own status and its predecessor's.
    ///
    /// `predecessor` is `None` when there is no predecessor (start of the run,
    /// or the previous file failed).
    pub fn new(is_duplicate: bool, predecessor: Option<bool>) -> Self {
        Self {
            is_duplicate,
            first_in_book: first_in_book(is_duplicate, predecessor),
        }
    }
}

/// Compare two comparison keys.
///
/// # Examples
///
/// ```
/// use rtf_oxide::pipeline::duplicates::is_duplicate;
///
/// assert!(is_duplicate("{\"a\":1}\n", "{\"a\":1}"));
/// assert!(!is_duplicate("{\"a\":1}", "{\"a\":2}"));
/// ```
pub fn is_duplicate(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

/// A duplicate starts a book when its predecessor is not a duplicate.
pub fn first_in_book(is_duplicate: bool, predecessor: Option<bool>) -> bool {
    is_duplicate && !predecessor.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let a = " {\"x\":[1]} ";
        let b = "{\"x\":[1]}";
        assert_eq!(is_duplicate(a, b), is_duplicate(b, a));
        assert!(is_duplicate(a, b));
    }

    #[test]
    fn test_flags_for_run_start() {
        assert_eq!(
            DuplicateFlags::new(true, Some(false)),
            DuplicateFlags {
                is_duplicate: true,
                first_in_book: true
            }
        );
        assert_eq!(
            DuplicateFlags::new(true, Some(true)),
            DuplicateFlags {
                is_duplicate: true,
                first_in_book: false
            }
        );
        assert_eq!(DuplicateFlags::new(false, None), DuplicateFlags::default());
    }

    #[test]
    fn test_first_in_book_after_gap() {
        assert!(first_in_book(true, None));
        assert!(!first_in_book(true, Some(true)));
        assert!(!first_in_book(false, Some(false)));
    }
}
