/// Number of columns a string occupies once escape sequences are
/// removed. Every remaining char counts as one column.
pub fn visible_width(s: &str) -> usize {
    strip_sgr(s).chars().count()
}

/// Remove SGR (and any other ANSI) escape sequences, leaving the plain text.
pub fn strip_sgr(s: &str) -> String {
    strip_ansi_escapes::strip_str(s)
}

/// Right-pad `s` with spaces so that its visible width is at least `width`.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let visible = visible_width(s);
    if visible >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + width - visible);
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', width - visible));
    out
}

/// First `max_chars` chars of `s` (plain text only).
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Drop every trailing `\n` / `\r` from `s`.
pub fn trim_ending_newlines(s: &str) -> &str {
    s.trim_end_matches(['\n', '\r'])
}

/// Normalize Windows line endings to `\n`.
pub fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}
