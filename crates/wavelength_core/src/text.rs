//! Shared text helpers for term normalization, word boundaries, and
//! attribute escaping.

use std::ops::Range;

/// Trim a search term and drop it when nothing is left.
///
/// # Returns
/// `None` for empty or whitespace-only input; otherwise the trimmed slice.
pub fn normalize_term(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Return `true` for characters that continue a word (Unicode alphanumerics
/// and `_`).
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Return `true` when `range` of `text` is not glued to a word character on
/// either side.
///
/// Only the neighbouring characters are inspected, so terms that begin or
/// end with punctuation (`C++`, `.NET`) still get a meaningful boundary.
pub fn is_whole_word(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Byte offset of the character boundary following `index`.
///
/// `index` must itself be a character boundary.
pub fn next_char_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// Escape a value for use inside a double-quoted HTML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
