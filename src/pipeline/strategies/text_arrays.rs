//! TJ-operator strategy: recover the string literals of `[ … ] TJ` arrays.
//!
//! `TJ` shows an array of strings interleaved with kerning offsets; most PDF
//! producers emit body text this way, one word or syllable per literal. The
//! scan covers only the head of the payload (100 000 base64 chars by
//! default), decoded in chunks that are skipped individually on failure.

use crate::config::ExtractionConfig;
use crate::error::StrategyError;
use crate::output::Method;
use crate::pipeline::decode::decode_chunks;
use crate::pipeline::postprocess::{collapse_whitespace, join_fragments, unescape_literal};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_TJ_ARRAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\s*TJ").unwrap());
static RE_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(((?:[^()\\]|\\.)*)\)").unwrap());

pub fn extract(payload: &str, config: &ExtractionConfig) -> Result<String, StrategyError> {
    let decoded: String = decode_chunks(payload, config.tj_chunk_len, config.tj_scan_limit)
        .flatten()
        .collect();

    let fragments = array_fragments(&decoded);
    debug!("tj-operator: {} fragments", fragments.len());

    let text = collapse_whitespace(&join_fragments(&fragments));
    if text.is_empty() {
        Err(StrategyError::no_text(
            Method::TjOperator,
            "no TJ arrays with string literals found",
        ))
    } else {
        Ok(text)
    }
}

/// Every string literal of every `TJ` array, in document order.
fn array_fragments(content: &str) -> Vec<String> {
    RE_TJ_ARRAY
        .captures_iter(content)
        .flat_map(|array| {
            RE_LITERAL
                .captures_iter(&array[1])
                .map(|lit| unescape_literal(&lit[1]))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::input::encode_bytes;

    #[test]
    fn recovers_tj_arrays() {
        let pdf = b"BT /F1 11 Tf [(Senior)-250(Software)-250(Engineer)] TJ ET\n\
                    BT [(full)(-stack)( , )(back-)(end)] TJ ET";
        let text = extract(&encode_bytes(pdf), &ExtractionConfig::default()).unwrap();
        assert_eq!(text, "Senior Software Engineer full-stack , back-end");
    }

    #[test]
    fn escaped_parens_stay_in_literal() {
        let frags = array_fragments(r"[(Rust \(2021\))] TJ");
        assert_eq!(frags, vec!["Rust (2021)".to_string()]);
    }

    #[test]
    fn ignores_text_beyond_scan_limit() {
        let cfg = ExtractionConfig::builder()
            .tj_scan_limit(40)
            .tj_chunk_len(40)
            .build()
            .unwrap();
        let mut pdf = vec![b' '; 60];
        pdf.extend_from_slice(b"[(Hidden)] TJ");
        let err = extract(&encode_bytes(&pdf), &cfg).unwrap_err();
        assert_eq!(err.method(), Method::TjOperator);
    }

    #[test]
    fn single_tj_strings_are_not_arrays() {
        assert!(array_fragments("(Hello) Tj").is_empty());
    }
}
