//! Observer trait for per-strategy extraction events.
//!
//! Inject an [`Arc<dyn ExtractionObserver>`] via
//! [`crate::config::ExtractionConfigBuilder::observer`] to watch the cascade
//! as it runs: which strategy started, what each produced and how it scored,
//! which failed, and how the call ended.
//!
//! Events are also emitted as `tracing` records; the observer exists for
//! callers that want structured values rather than log lines (metrics,
//! test assertions, a progress display).
//!
//! # Example
//!
//! ```rust
//! use pdf_salvage::{ExtractionConfig, ExtractionObserver, Method};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     candidates: AtomicUsize,
//! }
//!
//! impl ExtractionObserver for CountingObserver {
//!     fn on_candidate(&self, _method: Method, _text_len: usize, _score: Option<f64>) {
//!         self.candidates.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let observer = Arc::new(CountingObserver { candidates: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .observer(observer as Arc<dyn ExtractionObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{Method, Outcome};
use std::sync::Arc;

/// Called by the orchestrator as it runs each strategy.
///
/// Implementations must be `Send + Sync`: the same config (and observer) is
/// shared by concurrent extractions in [`crate::stream::extract_stream`].
/// All methods default to no-ops.
pub trait ExtractionObserver: Send + Sync {
    /// Called once, after normalisation.
    ///
    /// # Arguments
    /// * `input_len` — length of the normalised payload in characters
    fn on_extraction_start(&self, input_len: usize) {
        let _ = input_len;
    }

    /// Called just before a strategy runs.
    fn on_strategy_start(&self, method: Method) {
        let _ = method;
    }

    /// Called when a strategy returns text.
    ///
    /// # Arguments
    /// * `method`   — the strategy
    /// * `text_len` — length of the text in characters
    /// * `score`    — quality score if the candidate was scored; `None` for
    ///   the direct strategy and for text below the minimum length
    fn on_candidate(&self, method: Method, text_len: usize, score: Option<f64>) {
        let _ = (method, text_len, score);
    }

    /// Called when a strategy fails inside its boundary.
    fn on_strategy_error(&self, method: Method, error: &str) {
        let _ = (method, error);
    }

    /// Called once with the final outcome.
    fn on_extraction_complete(&self, outcome: &Outcome) {
        let _ = outcome;
    }
}

/// A no-op observer, used when none is configured.
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type SharedObserver = Arc<dyn ExtractionObserver>;
