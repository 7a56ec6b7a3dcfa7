//! The extraction strategies.
//!
//! Each strategy is an independent pure function over the normalised payload:
//! it shares no state with the others, and failure is reported through its
//! own `Result`. The orchestrator in [`crate::extract`] decides which to
//! run, scores what they return and picks the winner.
//!
//! | Method | Works on | Module |
//! |--------|----------|--------|
//! | `direct` | three decoded slices | [`markers`] |
//! | `binary-chunks` | every 5 000-char chunk | [`chunks`] |
//! | `fallback` | the undecoded payload | [`fallback`] |
//! | `tj-operator` | first 100 000 chars, decoded | [`text_arrays`] |

pub mod chunks;
pub mod fallback;
pub mod markers;
pub mod text_arrays;

use crate::config::ExtractionConfig;
use crate::error::StrategyError;
use crate::output::Method;

/// Run one strategy over `payload`.
pub fn run(method: Method, payload: &str, config: &ExtractionConfig) -> Result<String, StrategyError> {
    match method {
        Method::Direct => markers::extract(payload, config),
        Method::BinaryChunks => chunks::extract(payload, config),
        Method::Fallback => fallback::extract(payload),
        Method::TjOperator => text_arrays::extract(payload, config),
    }
}

/// Keep the longest of several pattern results (first wins on ties).
pub(crate) fn longest(results: impl IntoIterator<Item = String>) -> String {
    let mut best = String::new();
    let mut best_len = 0;
    for r in results {
        let len = r.chars().count();
        if len > best_len {
            best_len = len;
            best = r;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefers_first_on_tie() {
        let r = longest(["abc".to_string(), "xyz".to_string(), "a".to_string()]);
        assert_eq!(r, "abc");
        assert_eq!(longest(Vec::<String>::new()), "");
    }

    #[test]
    fn run_dispatches_every_method() {
        let cfg = ExtractionConfig::default();
        for m in [Method::Direct, Method::BinaryChunks, Method::Fallback, Method::TjOperator] {
            // Empty payload: every strategy reports "no text" rather than panicking.
            let err = run(m, "", &cfg).unwrap_err();
            assert_eq!(err.method(), m);
        }
    }
}
