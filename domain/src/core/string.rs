//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Collapse all whitespace runs into single spaces, then [`truncate`].
///
/// A `max_len` of zero disables clipping. Budgets of three bytes or less
/// cut without an ellipsis.
pub fn clip_line(s: &str, max_len: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if max_len == 0 || collapsed.len() <= max_len {
        return collapsed;
    }
    if max_len <= 3 {
        let mut end = max_len;
        while end > 0 && !collapsed.is_char_boundary(end) {
            end -= 1;
        }
        return collapsed[..end].to_string();
    }
    truncate(&collapsed, max_len)
}

/// Render a value as a double-quoted inline scalar, escaping `\` and `"`.
pub fn quote_inline(s: &str) -> String {
    let escaped = s.trim().replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'あ' is 3 bytes; target 7 backs up to byte 6
        assert_eq!(truncate("あいうえお", 10), "あい...");
        assert_eq!(truncate("あいう", 9), "あいう");
    }

    #[test]
    fn test_clip_line_collapses_whitespace() {
        assert_eq!(clip_line("  a\n\n b\t c  ", 0), "a b c");
        assert_eq!(clip_line("one two three", 9), "one tw...");
    }

    #[test]
    fn test_clip_line_tiny_budget() {
        assert_eq!(clip_line("abcdef", 2), "ab");
    }

    #[test]
    fn test_quote_inline_escapes() {
        assert_eq!(quote_inline(r#" say "hi" \o/ "#), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
    }
}
