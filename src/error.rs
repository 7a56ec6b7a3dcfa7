//! Error types for the pdf-salvage library.
//!
//! Three error types reflect three distinct failure scopes:
//!
//! * [`SalvageError`] — **Fatal**: the call itself failed (unreadable file,
//!   invalid configuration, a panic escaping the pipeline, a deadline). This
//!   is the only error a caller must handle explicitly. Failing to find any
//!   readable text is *not* an error; it yields the diagnostic message.
//!
//! * [`StrategyError`] — **Non-fatal**: one extraction strategy produced
//!   nothing. The orchestrator logs it and moves on to the next strategy.
//!
//! * [`DecodeError`] — **Routine**: one base64 chunk did not decode (a slice
//!   boundary landed mid-group, stray bytes). The chunk contributes nothing
//!   and the scan continues.

use crate::output::Method;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-salvage library.
#[derive(Debug, Error)]
pub enum SalvageError {
    /// The pipeline failed outside the per-strategy boundaries.
    #[error("PDF text extraction failed: {message}")]
    ExtractionFailed { message: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading input.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Async wrapper errors ──────────────────────────────────────────────
    /// The caller-imposed deadline elapsed before extraction finished.
    #[error("PDF text extraction timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Unexpected internal error (e.g. the blocking task was cancelled).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of a single extraction strategy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StrategyError {
    /// The strategy ran but recovered no text.
    #[error("{method}: {reason}")]
    NoText { method: Method, reason: String },

    /// The strategy panicked; the panic was contained at its boundary.
    #[error("{method}: strategy aborted: {message}")]
    Panicked { method: Method, message: String },
}

impl StrategyError {
    pub fn no_text(method: Method, reason: impl Into<String>) -> Self {
        StrategyError::NoText {
            method,
            reason: reason.into(),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            StrategyError::NoText { method, .. } | StrategyError::Panicked { method, .. } => {
                *method
            }
        }
    }
}

/// A single base64 chunk that could not be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("base64 chunk at offset {offset} ({len} chars) did not decode: {source}")]
pub struct DecodeError {
    pub offset: usize,
    pub len: usize,
    #[source]
    pub source: base64::DecodeError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_failed_display() {
        let e = SalvageError::ExtractionFailed {
            message: "index out of bounds".into(),
        };
        assert_eq!(
            e.to_string(),
            "PDF text extraction failed: index out of bounds"
        );
    }

    #[test]
    fn timeout_display() {
        let e = SalvageError::Timeout { elapsed_ms: 250 };
        assert!(e.to_string().contains("250ms"));
    }

    #[test]
    fn strategy_error_names_method() {
        let e = StrategyError::no_text(Method::Fallback, "nothing matched");
        assert_eq!(e.method(), Method::Fallback);
        assert!(e.to_string().starts_with("fallback:"), "got: {e}");
    }

    #[test]
    fn decode_error_display() {
        let e = DecodeError {
            offset: 5000,
            len: 5000,
            source: base64::DecodeError::InvalidLength(4997),
        };
        let msg = e.to_string();
        assert!(msg.contains("offset 5000"), "got: {msg}");
    }
}
