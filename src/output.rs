//! Result types returned by the extraction entry points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The extraction strategies, in the order the orchestrator runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Marker scan over three decoded slices (start, middle, end).
    Direct,
    /// Chunked decode keeping text-like runs from text-heavy chunks.
    BinaryChunks,
    /// Pattern scan directly over the undecoded input.
    Fallback,
    /// `[...] TJ` array show-text operators.
    TjOperator,
}

impl Method {
    /// The scored strategies, run when [`Method::Direct`] is not accepted.
    pub const SCORED: [Method; 3] = [Method::BinaryChunks, Method::Fallback, Method::TjOperator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Direct => "direct",
            Method::BinaryChunks => "binary-chunks",
            Method::Fallback => "fallback",
            Method::TjOperator => "tj-operator",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One strategy's proposed text and its quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub score: f64,
    pub method: Method,
}

/// Summary of a retained candidate, without its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub method: Method,
    pub text_len: usize,
    pub score: f64,
}

impl From<&Candidate> for CandidateReport {
    fn from(c: &Candidate) -> Self {
        Self {
            method: c.method,
            text_len: c.text.chars().count(),
            score: c.score,
        }
    }
}

/// How the returned text was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Text recovered by `method`. `score` is `None` for the direct
    /// strategy, which is gated by the readability check instead.
    Accepted { method: Method, score: Option<f64> },
    /// No candidate cleared the bar; the diagnostic message was returned.
    Fallback { best_score: Option<f64> },
}

impl Outcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }
}

/// Timing and size information for one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Length of the normalised payload in characters.
    pub input_len: usize,
    /// Strategies that failed inside their boundary.
    pub failed_strategies: usize,
    pub duration_ms: u64,
}

/// Complete output of [`crate::extract::extract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Recovered text, or the diagnostic message on total failure.
    pub text: String,
    pub outcome: Outcome,
    /// Every candidate the scored path retained, in strategy order.
    pub candidates: Vec<CandidateReport>,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_serialises_kebab_case() {
        let json = serde_json::to_string(&Method::TjOperator).unwrap();
        assert_eq!(json, "\"tj-operator\"");
        assert_eq!(Method::BinaryChunks.to_string(), "binary-chunks");
    }

    #[test]
    fn outcome_is_tagged() {
        let json = serde_json::to_value(Outcome::Fallback { best_score: None }).unwrap();
        assert_eq!(json["kind"], "fallback");
        assert!(Outcome::Fallback { best_score: Some(0.2) }.is_fallback());
        assert!(!Outcome::Accepted {
            method: Method::Direct,
            score: None
        }
        .is_fallback());
    }

    #[test]
    fn report_counts_chars_not_bytes() {
        let c = Candidate {
            text: "café".into(),
            score: 0.5,
            method: Method::Fallback,
        };
        assert_eq!(CandidateReport::from(&c).text_len, 4);
    }
}
