//! Subsequence matching
//!
//! A pattern matches when its characters appear in the text in the same
//! relative order, not necessarily adjacent, ignoring case. "12a" matches
//! "1-2-A-100".

/// Case-insensitive subsequence match; the empty pattern matches everything
pub fn fuzzy_match(text: &str, pattern: &str) -> bool {
    let mut text_chars = text.chars().flat_map(char::to_lowercase);
    pattern
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| text_chars.any(|t| t == p))
}

/// True if any of the fields matches the pattern
pub fn fuzzy_match_any<'a, I>(fields: I, pattern: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    if pattern.is_empty() {
        return true;
    }
    fields.into_iter().any(|field| fuzzy_match(field, pattern))
}
