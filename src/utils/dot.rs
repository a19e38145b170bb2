//! Graphviz helpers shared by the CFG export.

/// Escapes `s` for use inside a double-quoted DOT label.
///
/// Flowchart labels are free text typed by users, so quotes, backslashes,
/// newlines and record delimiters all need escaping.
///
/// # Examples
///
/// ```rust
/// use flowscope::utils::escape_dot;
///
/// assert_eq!(escape_dot("x > \"0\""), "x \\> \\\"0\\\"");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            '<' => escaped.push_str("\\<"),
            '>' => escaped.push_str("\\>"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            '|' => escaped.push_str("\\|"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot_plain() {
        assert_eq!(escape_dot("Output"), "Output");
    }

    #[test]
    fn test_escape_dot_relational_label() {
        assert_eq!(escape_dot("i <= 10"), "i \\<= 10");
    }

    #[test]
    fn test_escape_dot_quotes_and_newlines() {
        assert_eq!(escape_dot("say \"hi\"\r\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape_dot("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_dot_record_delimiters() {
        assert_eq!(escape_dot("{a|b}"), "\\{a\\|b\\}");
    }
}
