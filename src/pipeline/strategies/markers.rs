//! Direct strategy: pattern scan over three decoded slices.
//!
//! Decodes a window at the start, middle and end of the payload, then runs
//! three independent patterns over the combined text and keeps the longest
//! result:
//!
//! 1. literal strings `( … )` holding at least two alphanumerics
//! 2. the first printable run (≥ 5 chars) within 100 chars after each `BT`
//! 3. runs of three or more alphanumeric tokens separated by blanks
//!
//! Runs from patterns 2 and 3 pass through an operator filter: PDF operators
//! at either end are trimmed (`… 3.9 GPA Tj ET` keeps `… 3.9 GPA`) and a run
//! left with no real word in it (`F1 12 Tf 72 700 Td`, `Tj ET BT`) is dropped.
//!
//! Windows start on a base64 group boundary so the middle and end slices
//! decode to real bytes instead of bit-shifted noise.

use crate::config::ExtractionConfig;
use crate::error::StrategyError;
use crate::output::Method;
use crate::pipeline::decode::{align_down, decode_window};
use crate::pipeline::postprocess::unescape_literal;
use crate::pipeline::strategies::longest;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// How far past a `BT` marker to look for text, in characters.
const BT_LOOKAHEAD: usize = 100;

static RE_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]*)\)").unwrap());
static RE_BT: Lazy<Regex> = Lazy::new(|| Regex::new(r"BT").unwrap());
static RE_PRINTABLE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[A-Za-z0-9][A-Za-z0-9 .,;:!?'"\-]{4,}"#).unwrap());
static RE_WORD_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+(?:[ \t]+[A-Za-z0-9]+){2,}").unwrap());

/// Content-stream operators and object keywords that show up between text.
const PDF_OPERATORS: &[&str] = &[
    "BT", "ET", "Tc", "Tw", "Tz", "TL", "Tf", "Tr", "Ts", "Td", "TD", "Tm", "Tj", "TJ", "cm",
    "re", "gs", "Do", "BI", "ID", "EI", "sh", "BMC", "BDC", "EMC", "BX", "EX", "CS", "cs",
    "SC", "SCN", "sc", "scn", "RG", "rg", "ri", "d0", "d1", "q", "Q", "R", "obj", "endobj",
    "stream", "endstream", "xref", "trailer", "startxref",
];

pub fn extract(payload: &str, config: &ExtractionConfig) -> Result<String, StrategyError> {
    let decoded = decode_slices(payload, config.slice_len);
    if decoded.is_empty() {
        return Err(StrategyError::no_text(
            Method::Direct,
            "no slice could be decoded",
        ));
    }

    let text = longest([
        literal_strings(&decoded),
        text_after_markers(&decoded),
        word_runs(&decoded),
    ]);
    debug!("direct: {} chars recovered", text.chars().count());

    if text.is_empty() {
        Err(StrategyError::no_text(Method::Direct, "no text patterns found"))
    } else {
        Ok(text)
    }
}

/// Decode the start, middle and end windows and join what decodes.
fn decode_slices(payload: &str, slice_len: usize) -> String {
    let len = payload.len();
    let starts = [
        0,
        align_down((len / 2).saturating_sub(slice_len / 2)),
        align_down(len.saturating_sub(slice_len)),
    ];
    starts
        .iter()
        .filter_map(|&start| decode_window(payload, start, slice_len).ok())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn literal_strings(text: &str) -> String {
    RE_LITERAL
        .captures_iter(text)
        .filter_map(|c| {
            let inner = unescape_literal(&c[1]);
            let alnum = inner.chars().filter(|c| c.is_ascii_alphanumeric()).count();
            (alnum >= 2).then(|| inner.trim().to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_after_markers(text: &str) -> String {
    RE_BT
        .find_iter(text)
        .filter_map(|m| {
            let window: String = text[m.end()..].chars().take(BT_LOOKAHEAD).collect();
            RE_PRINTABLE_RUN
                .find_iter(&window)
                .find_map(|run| strip_operators(run.as_str()))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn word_runs(text: &str) -> String {
    RE_WORD_RUN
        .find_iter(text)
        .filter_map(|m| strip_operators(m.as_str()))
        .filter(|run| run.split_whitespace().count() >= 3)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim operator tokens off both ends of a run; `None` if no word remains.
fn strip_operators(run: &str) -> Option<String> {
    let tokens: Vec<&str> = run.split_whitespace().collect();
    let start = tokens.iter().position(|t| !is_operator(t))?;
    let end = tokens.iter().rposition(|t| !is_operator(t))?;
    let kept = &tokens[start..=end];
    kept.iter()
        .any(|t| is_word(t))
        .then(|| kept.join(" "))
}

fn is_operator(token: &str) -> bool {
    PDF_OPERATORS.contains(&token)
}

/// Two or more letters and not an operator: `MSc`, `GPA`, `iOS`, not `F1`.
fn is_word(token: &str) -> bool {
    !is_operator(token) && token.chars().filter(|c| c.is_ascii_alphabetic()).count() >= 2
}
