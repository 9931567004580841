//! Literal `\uXXXX` escape decoding.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static UNICODE_ESCAPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("Invalid unicode escape regex"));

/// Replace literal `\uXXXX` sequences with the characters they name.
///
/// Backends sometimes double-encode non-ASCII headings, leaving escapes in
/// the markdown text. Sequences that do not name a character on their own
/// (UTF-16 surrogate halves) are kept verbatim.
pub fn decode_unicode_escapes(text: &str) -> Cow<'_, str> {
    UNICODE_ESCAPE_REGEX.replace_all(text, |caps: &Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_escapes() {
        assert_eq!(decode_unicode_escapes(r"# \u6838\u5fc3"), "# 核心");
        assert_eq!(decode_unicode_escapes(r"caf\u00e9"), "café");
    }

    #[test]
    fn test_leaves_plain_text_borrowed() {
        assert!(matches!(decode_unicode_escapes("# Topic"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_keeps_incomplete_and_surrogate_escapes() {
        assert_eq!(decode_unicode_escapes(r"\u12"), r"\u12");
        assert_eq!(decode_unicode_escapes(r"\ud83d"), r"\ud83d");
    }
}
