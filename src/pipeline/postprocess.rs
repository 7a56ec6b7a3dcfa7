//! Post-processing: turn raw PDF string fragments into running text.
//!
//! PDF content streams split words and lines into many small string
//! literals, often with escape sequences left in. These helpers are pure
//! `&str → String` passes shared by the strategies that recover literals.

use once_cell::sync::Lazy;
use regex::Regex;

// ── Literal unescaping ───────────────────────────────────────────────────────

/// Decode the escape sequences PDF allows inside `( … )` string literals.
///
/// Handles `\n \r \t \b \f \( \) \\`, octal `\ddd` (1–3 digits) and
/// backslash-newline line continuations. Unknown escapes keep the escaped
/// character and drop the backslash.
pub fn unescape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('\n') => {}
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(d @ '0'..='7') => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(v) => {
                            code = code * 8 + v;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from((code & 0xFF) as u8));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

// ── Fragment joining ─────────────────────────────────────────────────────────

/// Join fragments with a single space, except where the join point looks
/// like the middle of a hyphenated or punctuated word.
///
/// No space is inserted after a fragment ending in `-`, or before one
/// starting with `-`, `,` or `.`. A sentence end followed by a capital
/// always gets a space.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut out = String::new();
    for frag in fragments {
        let frag = frag.as_ref();
        if frag.is_empty() {
            continue;
        }
        if let (Some(prev), Some(next)) = (out.chars().last(), frag.chars().next()) {
            if needs_space(prev, next) {
                out.push(' ');
            }
        }
        out.push_str(frag);
    }
    out
}

fn needs_space(prev: char, next: char) -> bool {
    if prev == '.' && next.is_uppercase() {
        return true;
    }
    !(prev == '-' || matches!(next, '-' | ',' | '.'))
}

// ── Whitespace ───────────────────────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace to one space and trim the ends.
pub fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_simple() {
        assert_eq!(unescape_literal(r"Hello\(World\)"), "Hello(World)");
        assert_eq!(unescape_literal(r"a\\b"), r"a\b");
        assert_eq!(unescape_literal(r"line\nnext"), "line\nnext");
    }

    #[test]
    fn test_unescape_octal() {
        assert_eq!(unescape_literal(r"caf\351"), "caf\u{e9}");
        assert_eq!(unescape_literal(r"\101B"), "AB");
        assert_eq!(unescape_literal(r"\0"), "\0");
    }

    #[test]
    fn test_unescape_continuation_and_trailing() {
        assert_eq!(unescape_literal("long\\\nline"), "longline");
        assert_eq!(unescape_literal("dangling\\"), "dangling");
    }

    #[test]
    fn test_join_plain_words() {
        assert_eq!(join_fragments(&["Senior", "Engineer"]), "Senior Engineer");
    }

    #[test]
    fn test_join_hyphenation() {
        assert_eq!(join_fragments(&["back-", "end"]), "back-end");
        assert_eq!(join_fragments(&["full", "-stack"]), "full-stack");
    }

    #[test]
    fn test_join_punctuation() {
        assert_eq!(join_fragments(&["Rust", ", Go"]), "Rust, Go");
        assert_eq!(join_fragments(&["Done", "."]), "Done.");
        assert_eq!(join_fragments(&["Ended.", "Next"]), "Ended. Next");
    }

    #[test]
    fn test_join_skips_empty() {
        assert_eq!(join_fragments(&["", "a", "", "b"]), "a b");
        assert_eq!(join_fragments::<&str>(&[]), "");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c  "), "a b c");
        assert_eq!(collapse_whitespace(""), "");
    }
}
