//! Shell quoting for completion candidates
//!
//! Words made only of "safe" characters (`\w` plus `@%+=:,./-`) are emitted
//! verbatim; anything else is wrapped in quotes.

/// Check whether a character can appear unquoted in a shell word
fn is_safe(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}

/// Return a single-quoted, shell-escaped version of `s`.
///
/// Embedded single quotes are closed, emitted inside double quotes and
/// reopened, so `$'b` becomes `'$'"'"'b'`.
pub fn single_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(is_safe) {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', r#"'"'"'"#))
}

/// Return a double-quoted version of `s`.
///
/// Mirrors [`single_quote`]: embedded double quotes are closed, emitted inside
/// single quotes and reopened, so `$"b` becomes `"$"'"'"b"`. Other characters
/// that are special inside double quotes (`$`, `` ` ``, `\`) are left as they
/// are.
pub fn double_quote(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    if s.chars().all(is_safe) {
        return s.to_string();
    }

    format!("\"{}\"", s.replace('"', r#""'"'""#))
}
