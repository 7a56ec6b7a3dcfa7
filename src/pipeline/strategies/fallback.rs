//! Fallback strategy: patterns applied to the payload as-is, without
//! decoding.
//!
//! Useful when the "base64" is really plain text or a PDF pasted as text, and
//! as a last look at payloads where every decode failed. Four patterns run
//! independently; the longest result wins:
//!
//! 1. parenthesised content of 3+ chars that is not purely numeric
//! 2. clusters of three or more alphabetic words
//! 3. string literals inside `[ … ] TJ` arrays
//! 4. alphabetic tokens of 4+ chars with whitespace on both sides

use crate::error::StrategyError;
use crate::output::Method;
use crate::pipeline::postprocess::{join_fragments, unescape_literal};
use crate::pipeline::strategies::longest;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Reason reported when no pattern matched.
pub const NO_TEXT_REASON: &str = "Could not extract readable text from the raw document data";

static RE_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]{3,})\)").unwrap());
static RE_WORD_CLUSTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]{2,}(?:\s+[A-Za-z]{2,}){2,}").unwrap());
static RE_TJ_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\s*TJ").unwrap());
static RE_ARRAY_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(((?:[^()\\]|\\.)*)\)").unwrap());

pub fn extract(payload: &str) -> Result<String, StrategyError> {
    let text = longest([
        parenthesised(payload),
        word_clusters(payload),
        tj_literals(payload),
        isolated_words(payload),
    ]);
    debug!("fallback: {} chars recovered", text.chars().count());

    if text.is_empty() {
        Err(StrategyError::no_text(Method::Fallback, NO_TEXT_REASON))
    } else {
        Ok(text)
    }
}

fn parenthesised(text: &str) -> String {
    RE_PARENS
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty() && !is_numeric(s))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_numeric(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | '-' | '+'))
}

fn word_clusters(text: &str) -> String {
    RE_WORD_CLUSTER
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn tj_literals(text: &str) -> String {
    let fragments: Vec<String> = RE_TJ_ARRAY
        .captures_iter(text)
        .flat_map(|array| {
            RE_ARRAY_LITERAL
                .captures_iter(&array[1])
                .map(|lit| unescape_literal(&lit[1]))
                .collect::<Vec<_>>()
        })
        .collect();
    join_fragments(&fragments)
}

fn isolated_words(text: &str) -> String {
    let pieces: Vec<&str> = text.split(char::is_whitespace).collect();
    if pieces.len() < 3 {
        return String::new();
    }
    pieces[1..pieces.len() - 1]
        .iter()
        .filter(|p| p.len() >= 4 && p.chars().all(|c| c.is_ascii_alphabetic()))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_base64_yields_no_text() {
        let payload = "JVBERi0xLjQKJcfsj6IKNSAwIG9iago8PC9MZW5ndGggNiAwIFIvRmlsdGVy";
        let err = extract(payload).unwrap_err();
        assert_eq!(err.to_string(), format!("fallback: {NO_TEXT_REASON}"));
    }

    #[test]
    fn parenthesised_skips_numbers() {
        assert_eq!(parenthesised("(12 34) (John Smith) (ab) (3.14)"), "John Smith");
    }

    #[test]
    fn word_clusters_need_three_words() {
        assert_eq!(word_clusters("ab cd; Senior Rust Engineer"), "Senior Rust Engineer");
    }

    #[test]
    fn tj_arrays_are_joined() {
        let s = "[(Soft)-20(ware) (En)(gi)(neer)] TJ [(back-)(end)] TJ";
        assert_eq!(tj_literals(s), "Soft ware En gi neer back-end");
    }

    #[test]
    fn isolated_words_need_whitespace_both_sides() {
        assert_eq!(isolated_words("Edge middle words Edge"), "middle words");
        assert_eq!(isolated_words("NoWhitespaceAtAll"), "");
        assert_eq!(isolated_words("a abc1 word b"), "word");
    }

    #[test]
    fn plain_text_payload_is_recovered() {
        let s = "Professional summary: ten years of backend experience";
        let text = extract(s).unwrap();
        assert!(text.contains("ten years of backend experience"), "got: {text}");
    }
}
