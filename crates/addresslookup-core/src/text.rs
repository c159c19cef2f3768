// crates/addresslookup-core/src/text.rs

/// Minimum number of significant characters before a search is issued.
pub const MIN_QUERY_CHARS: usize = 3;

/// Normalizes raw input text into the canonical query form.
///
/// This performs:
/// 1\) Trim leading and trailing whitespace
/// 2\) Collapse every inner whitespace run into a single space
///
/// Case is preserved: the remote service decides how to match it.
///
/// # Examples
///
/// ```rust
/// use addresslookup_core::text::normalize_query;
///
/// assert_eq!(normalize_query("  10   Down\t"), "10 Down");
/// assert_eq!(normalize_query("   "), "");
/// ```
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Counts the visible (non-whitespace) characters of `s`.
#[inline]
pub fn significant_len(s: &str) -> usize {
    s.chars().filter(|c| !c.is_whitespace()).count()
}

/// Returns `true` when a normalized query is long enough to be searched.
#[inline]
pub fn is_searchable(query: &str) -> bool {
    significant_len(query) >= MIN_QUERY_CHARS
}

/// Normalizes a country code: trimmed, ASCII upper-case.
pub fn normalize_country(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
