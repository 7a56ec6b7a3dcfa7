//! Binary-chunks strategy: decode everything in bounded chunks and keep the
//! text-like runs of chunks that look like text.
//!
//! A chunk survives when its decoded bytes hold more than five letters, at
//! least one whitespace character, and letters make up more than 30 % of it.
//! Compressed or image streams fail the ratio test and are skipped wholesale.

use crate::config::ExtractionConfig;
use crate::error::StrategyError;
use crate::output::Method;
use crate::pipeline::decode::decode_chunks;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_TEXT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[A-Za-z0-9 \t\r\n.,;:!?'"()\[\]/@&%+\-]{5,}"#).unwrap());

pub fn extract(payload: &str, config: &ExtractionConfig) -> Result<String, StrategyError> {
    let mut decoded_chunks = 0usize;
    let mut kept = Vec::new();

    for chunk in decode_chunks(payload, config.chunk_len, usize::MAX).flatten() {
        decoded_chunks += 1;
        if !looks_textual(&chunk) {
            continue;
        }
        let runs = text_runs(&chunk);
        if !runs.is_empty() {
            kept.push(runs);
        }
    }

    debug!(
        "binary-chunks: kept {}/{} decoded chunks",
        kept.len(),
        decoded_chunks
    );

    if kept.is_empty() {
        return Err(StrategyError::no_text(
            Method::BinaryChunks,
            format!("none of {decoded_chunks} decoded chunks looked like text"),
        ));
    }
    Ok(kept.join(" "))
}

fn looks_textual(chunk: &str) -> bool {
    let mut len = 0usize;
    let mut letters = 0usize;
    let mut has_space = false;
    for c in chunk.chars() {
        len += 1;
        if c.is_ascii_alphabetic() {
            letters += 1;
        } else if c.is_ascii_whitespace() {
            has_space = true;
        }
    }
    letters > 5 && has_space && letters as f64 / len as f64 > 0.3
}

fn text_runs(chunk: &str) -> String {
    RE_TEXT_RUN
        .find_iter(chunk)
        .map(|m| m.as_str().trim())
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
