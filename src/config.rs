//! Configuration types for text recovery.
//!
//! Every bound and threshold the cascade uses lives in [`ExtractionConfig`],
//! built via its [`ExtractionConfigBuilder`]. The defaults reproduce the
//! reference behaviour exactly; changing them changes which candidates are
//! produced and accepted, so treat them as tuning knobs, not as limits.

use crate::error::SalvageError;
use crate::observer::{ExtractionObserver, NoopObserver, SharedObserver};
use std::fmt;
use std::sync::Arc;

/// Configuration for a text-recovery call.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_salvage::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .quality_threshold(0.5)
///     .concurrency(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Size of each of the three slices the direct strategy decodes
    /// (start, middle, end), in base64 characters. Default: 10 000.
    ///
    /// Text content can sit anywhere in a PDF, so sampling three windows
    /// finds it in most small documents without decoding a large file whole.
    pub slice_len: usize,

    /// Chunk size for the binary-chunks strategy, in base64 characters. Default: 5 000.
    pub chunk_len: usize,

    /// How much of the payload the TJ-operator strategy scans, in base64
    /// characters. Default: 100 000.
    pub tj_scan_limit: usize,

    /// Chunk size for the TJ-operator scan, in base64 characters. Default: 10 000.
    pub tj_chunk_len: usize,

    /// Direct-strategy text longer than this (in characters) is returned
    /// immediately if it also passes the readability check. Default: 200.
    pub early_accept_len: usize,

    /// Minimum length for a binary-chunks result to be scored. Default: 200.
    pub min_chunk_candidate_len: usize,

    /// Minimum length for fallback and TJ-operator results to be scored. Default: 100.
    pub min_candidate_len: usize,

    /// Lowest quality score the best candidate may have to be returned. Default: 0.4.
    pub quality_threshold: f64,

    /// Maximum documents processed at once by [`crate::stream::extract_stream`]. Default: 4.
    pub concurrency: usize,

    /// Event hook. Default: [`NoopObserver`].
    pub observer: SharedObserver,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            slice_len: 10_000,
            chunk_len: 5_000,
            tj_scan_limit: 100_000,
            tj_chunk_len: 10_000,
            early_accept_len: 200,
            min_chunk_candidate_len: 200,
            min_candidate_len: 100,
            quality_threshold: 0.4,
            concurrency: 4,
            observer: Arc::new(NoopObserver),
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("slice_len", &self.slice_len)
            .field("chunk_len", &self.chunk_len)
            .field("tj_scan_limit", &self.tj_scan_limit)
            .field("tj_chunk_len", &self.tj_chunk_len)
            .field("early_accept_len", &self.early_accept_len)
            .field("min_chunk_candidate_len", &self.min_chunk_candidate_len)
            .field("min_candidate_len", &self.min_candidate_len)
            .field("quality_threshold", &self.quality_threshold)
            .field("concurrency", &self.concurrency)
            .field("observer", &"<dyn ExtractionObserver>")
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn slice_len(mut self, len: usize) -> Self {
        self.config.slice_len = len;
        self
    }

    pub fn chunk_len(mut self, len: usize) -> Self {
        self.config.chunk_len = len;
        self
    }

    pub fn tj_scan_limit(mut self, limit: usize) -> Self {
        self.config.tj_scan_limit = limit;
        self
    }

    pub fn tj_chunk_len(mut self, len: usize) -> Self {
        self.config.tj_chunk_len = len;
        self
    }

    pub fn early_accept_len(mut self, len: usize) -> Self {
        self.config.early_accept_len = len;
        self
    }

    pub fn min_chunk_candidate_len(mut self, len: usize) -> Self {
        self.config.min_chunk_candidate_len = len;
        self
    }

    pub fn min_candidate_len(mut self, len: usize) -> Self {
        self.config.min_candidate_len = len;
        self
    }

    pub fn quality_threshold(mut self, t: f64) -> Self {
        self.config.quality_threshold = t.clamp(0.0, 1.0);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.config.observer = observer;
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Decode windows must be non-zero multiples of 4 so every chunk starts
    /// on a base64 group boundary.
    pub fn build(self) -> Result<ExtractionConfig, SalvageError> {
        let c = &self.config;
        for (name, value) in [
            ("slice_len", c.slice_len),
            ("chunk_len", c.chunk_len),
            ("tj_chunk_len", c.tj_chunk_len),
        ] {
            if value == 0 || value % 4 != 0 {
                return Err(SalvageError::InvalidConfig(format!(
                    "{name} must be a non-zero multiple of 4, got {value}"
                )));
            }
        }
        if c.tj_scan_limit < c.tj_chunk_len {
            return Err(SalvageError::InvalidConfig(format!(
                "tj_scan_limit ({}) must be at least tj_chunk_len ({})",
                c.tj_scan_limit, c.tj_chunk_len
            )));
        }
        if !c.quality_threshold.is_finite() {
            return Err(SalvageError::InvalidConfig(
                "quality_threshold must be a finite number".into(),
            ));
        }
        Ok(self.config)
    }
}
