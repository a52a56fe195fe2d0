//! Input classification.
//!
//! Decides whether what the user typed is a scripture reference, a single
//! name, or a free keyword phrase. The result picks the prompt template.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// What kind of study request the input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A book/chapter/verse citation such as `John 3:16`.
    ScriptureReference,
    /// A single token, assumed to be a person or place name.
    ProperName,
    /// Anything else.
    Keyword,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Classification::ScriptureReference => "scripture reference",
            Classification::ProperName => "proper name",
            Classification::Keyword => "keyword",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Optional book number, one to three book-name words, optional comma, then
// chapter:verse with both numbers positive. Leading zeros are allowed.
static SCRIPTURE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:(?:[1-3]|1st|2nd|3rd) ?)?[a-z]+(?: [a-z]+){0,2},? ",
        r"0*[1-9][0-9]*:0*[1-9][0-9]*$",
    ))
    .expect("Invalid scripture reference regex")
});

/// Whether `text` is a complete scripture reference.
pub fn is_scripture_reference(text: &str) -> bool {
    SCRIPTURE_REFERENCE.is_match(text.trim())
}

/// Whether `text` is a single whitespace-separated token.
///
/// Multi-word names ("John the Baptist") do not count and fall through to
/// [`Classification::Keyword`].
pub fn is_proper_name(text: &str) -> bool {
    text.split_whitespace().count() == 1
}

/// Classify user input. Pure; the reference check wins over the name check.
pub fn classify(text: &str) -> Classification {
    if is_scripture_reference(text) {
        Classification::ScriptureReference
    } else if is_proper_name(text) {
        Classification::ProperName
    } else {
        Classification::Keyword
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_references() {
        assert_eq!(classify("John 3:16"), Classification::ScriptureReference);
        assert_eq!(classify("Psalm 23:1"), Classification::ScriptureReference);
        assert_eq!(classify("genesis 1:1"), Classification::ScriptureReference);
        assert_eq!(
            classify("REVELATION 22:21"),
            Classification::ScriptureReference
        );
    }

    #[test]
    fn numbered_books() {
        assert_eq!(classify("1 John 3:16"), Classification::ScriptureReference);
        assert_eq!(classify("2 Kings 5:14"), Classification::ScriptureReference);
        assert_eq!(
            classify("1st Corinthians 13:4"),
            Classification::ScriptureReference
        );
        assert_eq!(classify("3rd John 1:2"), Classification::ScriptureReference);
        assert_eq!(
            classify("1Samuel 17:45"),
            Classification::ScriptureReference
        );
        assert!(!is_scripture_reference("4 Kings 1:1"));
    }

    #[test]
    fn multi_word_books_and_comma() {
        assert_eq!(
            classify("Song of Solomon 2:1"),
            Classification::ScriptureReference
        );
        assert_eq!(classify("Acts, 2:38"), Classification::ScriptureReference);
        // Four words is one too many.
        assert!(!is_scripture_reference("The Song of Solomon 2:1"));
    }

    #[test]
    fn book_name_is_required() {
        assert_ne!(classify("3:16"), Classification::ScriptureReference);
        assert_eq!(classify("3:16"), Classification::ProperName);
        assert!(!is_scripture_reference("1 3:16"));
    }

    #[test]
    fn chapter_and_verse_must_be_positive() {
        assert!(!is_scripture_reference("John 0:16"));
        assert!(!is_scripture_reference("John 3:0"));
        assert!(!is_scripture_reference("John 3"));
        assert!(!is_scripture_reference("John 3:"));
        assert!(!is_scripture_reference("John 00:16"));
        assert!(!is_scripture_reference("John 3:00"));
    }

    #[test]
    fn zero_padded_numbers_are_references() {
        assert!(is_scripture_reference("John 03:16"));
        assert!(is_scripture_reference("Psalm 023:001"));
        assert_eq!(classify("1 John 04:08"), Classification::ScriptureReference);
    }

    #[test]
    fn anchored_both_ends() {
        assert!(!is_scripture_reference("read John 3:16 today"));
        assert!(!is_scripture_reference("John 3:16-18"));
        assert!(is_scripture_reference("  John 3:16  "));
    }

    #[test]
    fn single_token_is_name() {
        assert_eq!(classify("Moses"), Classification::ProperName);
        assert_eq!(classify("Melchizedek"), Classification::ProperName);
        assert_eq!(classify("  Ruth\n"), Classification::ProperName);
    }

    #[test]
    fn phrases_are_keywords() {
        assert_eq!(classify("the ark of the covenant"), Classification::Keyword);
        assert_eq!(classify("John the Baptist"), Classification::Keyword);
        assert_eq!(classify(""), Classification::Keyword);
        assert_eq!(classify("   "), Classification::Keyword);
    }
}
