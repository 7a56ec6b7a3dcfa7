//! Extraction entry points: run the strategy cascade and pick a winner.
//!
//! ## Selection policy
//!
//! 1. Normalise the payload (strip the data-URL header).
//! 2. Run the direct strategy. If its text is longer than
//!    `early_accept_len` and passes [`is_readable`], return it.
//! 3. Otherwise run binary-chunks, fallback and tj-operator in that order.
//!    Each result longer than its minimum length is scored.
//! 4. Return the highest-scoring candidate if it reaches
//!    `quality_threshold`; ties go to the earlier strategy.
//! 5. Otherwise return [`FALLBACK_MESSAGE`].
//!
//! The direct strategy is gated by a boolean check while the others are
//! ranked by score; the two paths are intentionally different.
//!
//! ## Failure boundaries
//!
//! Every strategy runs inside its own boundary: an `Err` or a panic becomes
//! "no candidate" and the cascade continues. The pipeline as a whole runs
//! inside a second boundary; anything escaping it is returned as
//! [`SalvageError::ExtractionFailed`]. Not finding text is not an error.

use crate::config::ExtractionConfig;
use crate::error::{SalvageError, StrategyError};
use crate::output::{
    Candidate, CandidateReport, ExtractionOutput, ExtractionStats, Method, Outcome,
};
use crate::pipeline::quality::{assess_text_quality, is_readable};
use crate::pipeline::{input, strategies};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Returned in place of text when no strategy recovered anything usable.
pub const FALLBACK_MESSAGE: &str = "\
Unable to extract readable text from this PDF.

This can happen when:
- The PDF contains scanned images of text rather than selectable text
- The PDF has security restrictions that prevent text extraction
- The PDF uses a non-standard text encoding
- The file is corrupted or password-protected

Please try uploading the document in a different format (such as DOCX or TXT), \
or copy and paste the text content directly.";

/// True if `text` is the diagnostic message rather than recovered text.
pub fn is_fallback_message(text: &str) -> bool {
    text.trim() == FALLBACK_MESSAGE
}

/// Recover text from a base64 PDF (optionally a data URL) with default settings.
///
/// Returns the recovered text, or [`FALLBACK_MESSAGE`] when nothing usable
/// was found.
///
/// # Errors
/// Only [`SalvageError::ExtractionFailed`], for failures outside the
/// per-strategy boundaries.
///
/// # Example
/// ```rust
/// use pdf_salvage::{extract_text, is_fallback_message};
///
/// let text = extract_text("data:application/pdf;base64,JVBERi0xLjQK").unwrap();
/// assert!(is_fallback_message(&text));
/// ```
pub fn extract_text(input: &str) -> Result<String, SalvageError> {
    extract(input, &ExtractionConfig::default()).map(|output| output.text)
}

/// Recover text and report how it was chosen.
pub fn extract(input: &str, config: &ExtractionConfig) -> Result<ExtractionOutput, SalvageError> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        run_pipeline(input, config, &strategies::run)
    }))
    .map_err(|payload| {
        let message = panic_message(payload.as_ref());
        warn!("Extraction aborted: {}", message);
        SalvageError::ExtractionFailed { message }
    })
}

/// Recover text from raw PDF bytes.
pub fn extract_from_bytes(
    bytes: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, SalvageError> {
    extract(&input::encode_bytes(bytes), config)
}

/// Recover text from a file holding a raw PDF, bare base64 or a data URL.
pub fn extract_file(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, SalvageError> {
    let payload = input::read_document(path.as_ref())?;
    extract(&payload, config)
}

/// Run [`extract`] on tokio's blocking pool.
///
/// The cascade is CPU-bound and synchronous; this keeps it off the async
/// executor's worker threads.
pub async fn extract_async(
    input: impl Into<String>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, SalvageError> {
    let input = input.into();
    let config = config.clone();
    tokio::task::spawn_blocking(move || extract(&input, &config))
        .await
        .map_err(|e| SalvageError::Internal(format!("extraction task failed: {e}")))?
}

/// Run [`extract_async`] under a deadline.
///
/// The cascade itself cannot be cancelled: on timeout the caller gets
/// [`SalvageError::Timeout`] immediately while the blocking task runs to
/// completion in the background and its result is discarded.
pub async fn extract_with_timeout(
    input: impl Into<String>,
    config: &ExtractionConfig,
    timeout: Duration,
) -> Result<ExtractionOutput, SalvageError> {
    tokio::time::timeout(timeout, extract_async(input, config))
        .await
        .map_err(|_| SalvageError::Timeout {
            elapsed_ms: timeout.as_millis() as u64,
        })?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Runs one strategy by method. Production passes [`strategies::run`].
type StrategyRunner = dyn Fn(Method, &str, &ExtractionConfig) -> Result<String, StrategyError>;

fn run_pipeline(
    input: &str,
    config: &ExtractionConfig,
    runner: &StrategyRunner,
) -> ExtractionOutput {
    let start = Instant::now();
    let observer = &config.observer;

    // ── Step 1: Normalise ────────────────────────────────────────────────
    let payload = input::normalize(input);
    let input_len = payload.chars().count();
    debug!("Starting extraction: {} chars", input_len);
    observer.on_extraction_start(input_len);

    let mut failed = 0usize;

    // ── Step 2: Direct strategy with early accept ────────────────────────
    match run_strategy(runner, Method::Direct, payload, config) {
        Ok(text) => {
            let len = text.chars().count();
            observer.on_candidate(Method::Direct, len, None);
            if len > config.early_accept_len && is_readable(&text) {
                info!("Recovered {} chars via {}", len, Method::Direct);
                let outcome = Outcome::Accepted {
                    method: Method::Direct,
                    score: None,
                };
                observer.on_extraction_complete(&outcome);
                return ExtractionOutput {
                    text,
                    outcome,
                    candidates: Vec::new(),
                    stats: stats(input_len, failed, start),
                };
            }
            debug!("{}: {} chars not accepted, trying scored strategies", Method::Direct, len);
        }
        Err(e) => {
            failed += 1;
            report_failure(config, &e);
        }
    }

    // ── Step 3: Scored strategies ────────────────────────────────────────
    let mut candidates = Vec::new();
    for method in Method::SCORED {
        match run_strategy(runner, method, payload, config) {
            Ok(text) => {
                let len = text.chars().count();
                if len > min_candidate_len(method, config) {
                    let score = assess_text_quality(&text);
                    debug!("{}: {} chars, score {:.3}", method, len, score);
                    observer.on_candidate(method, len, Some(score));
                    candidates.push(Candidate {
                        text,
                        score,
                        method,
                    });
                } else {
                    debug!("{}: {} chars is below the minimum, ignored", method, len);
                    observer.on_candidate(method, len, None);
                }
            }
            Err(e) => {
                failed += 1;
                report_failure(config, &e);
            }
        }
    }

    // ── Step 4–5: Select or fall back ────────────────────────────────────
    let reports: Vec<CandidateReport> = candidates.iter().map(CandidateReport::from).collect();
    let best = select_best(candidates);

    let (text, outcome) = match best {
        Some(best) if best.score >= config.quality_threshold => {
            info!(
                "Recovered {} chars via {} (score {:.3})",
                best.text.chars().count(),
                best.method,
                best.score
            );
            let outcome = Outcome::Accepted {
                method: best.method,
                score: Some(best.score),
            };
            (best.text, outcome)
        }
        best => {
            let best_score = best.map(|c| c.score);
            warn!(
                "No candidate reached quality {:.2} (best: {:?}); returning diagnostic message",
                config.quality_threshold, best_score
            );
            (FALLBACK_MESSAGE.to_string(), Outcome::Fallback { best_score })
        }
    };

    observer.on_extraction_complete(&outcome);
    ExtractionOutput {
        text,
        outcome,
        candidates: reports,
        stats: stats(input_len, failed, start),
    }
}

/// Run one strategy inside its failure boundary.
fn run_strategy(
    runner: &StrategyRunner,
    method: Method,
    payload: &str,
    config: &ExtractionConfig,
) -> Result<String, StrategyError> {
    config.observer.on_strategy_start(method);
    panic::catch_unwind(AssertUnwindSafe(|| runner(method, payload, config)))
        .unwrap_or_else(|p| {
            Err(StrategyError::Panicked {
                method,
                message: panic_message(p.as_ref()),
            })
        })
}

fn report_failure(config: &ExtractionConfig, error: &StrategyError) {
    match error {
        StrategyError::NoText { .. } => debug!("{}", error),
        StrategyError::Panicked { .. } => warn!("{}", error),
    }
    config
        .observer
        .on_strategy_error(error.method(), &error.to_string());
}

fn min_candidate_len(method: Method, config: &ExtractionConfig) -> usize {
    match method {
        Method::BinaryChunks => config.min_chunk_candidate_len,
        _ => config.min_candidate_len,
    }
}

/// Highest score wins; the earliest candidate wins a tie.
fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().fold(None, |best, c| match best {
        Some(b) if b.score >= c.score => Some(b),
        _ => Some(c),
    })
}

fn stats(input_len: usize, failed_strategies: usize, start: Instant) -> ExtractionStats {
    ExtractionStats {
        input_len,
        failed_strategies,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ExtractionObserver;
    use crate::pipeline::input::encode_bytes;
    use std::sync::{Arc, Mutex};

    fn candidate(method: Method, score: f64) -> Candidate {
        Candidate {
            text: String::new(),
            score,
            method,
        }
    }

    fn resume_pdf() -> Vec<u8> {
        let mut pdf = b"%PDF-1.4\n1 0 obj << /Type /Page >> endobj\n".to_vec();
        for _ in 0..4 {
            pdf.extend_from_slice(
                b"BT /F1 12 Tf 72 700 Td (John Smith) Tj 0 -14 Td (Software Engineer) Tj \
                  0 -14 Td (Five years of professional experience in backend development) Tj \
                  0 -14 Td (Skills: Rust, Go, PostgreSQL, distributed systems) Tj ET\n",
            );
        }
        pdf.extend_from_slice(b"%%EOF\n");
        pdf
    }

    #[test]
    fn select_best_prefers_higher_then_earlier() {
        let best = select_best(vec![
            candidate(Method::BinaryChunks, 0.5),
            candidate(Method::Fallback, 0.7),
            candidate(Method::TjOperator, 0.7),
        ])
        .unwrap();
        assert_eq!(best.method, Method::Fallback);
        assert!(select_best(Vec::new()).is_none());
    }

    #[test]
    fn readable_direct_text_is_accepted_early() {
        let output = extract_from_bytes(&resume_pdf(), &ExtractionConfig::default()).unwrap();
        assert_eq!(
            output.outcome,
            Outcome::Accepted {
                method: Method::Direct,
                score: None
            }
        );
        assert!(output.text.contains("John Smith"));
        assert!(output.candidates.is_empty());
    }

    #[test]
    fn empty_input_returns_fallback() {
        let output = extract("", &ExtractionConfig::default()).unwrap();
        assert!(is_fallback_message(&output.text));
        assert_eq!(output.outcome, Outcome::Fallback { best_score: None });
        assert_eq!(output.stats.failed_strategies, 4);
    }

    #[test]
    fn garbage_input_never_errors() {
        for s in ["", "   ", "%%%", "not base64 at all ☃", "data:application/pdf;base64,"] {
            let text = extract_text(s).unwrap();
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let b64 = encode_bytes(&resume_pdf());
        assert_eq!(extract_text(&b64).unwrap(), extract_text(&b64).unwrap());
    }

    #[test]
    fn data_url_matches_bare_base64() {
        let b64 = encode_bytes(&resume_pdf());
        let url = format!("data:application/pdf;base64,{b64}");
        assert_eq!(extract_text(&url).unwrap(), extract_text(&b64).unwrap());
    }

    #[test]
    fn low_scoring_candidate_falls_back() {
        // Plain prose without keywords or line breaks reaches the fallback
        // strategy; demanding a perfect score forces the diagnostic path.
        let prose = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let config = ExtractionConfig::builder().quality_threshold(1.0).build().unwrap();
        let output = extract(&prose, &config).unwrap();
        assert!(is_fallback_message(&output.text));
        match output.outcome {
            Outcome::Fallback { best_score: Some(s) } => assert!(s < 1.0),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(output.candidates.iter().any(|c| c.method == Method::Fallback));
    }

    struct PanickingObserver;

    impl ExtractionObserver for PanickingObserver {
        fn on_extraction_start(&self, _input_len: usize) {
            panic!("observer exploded");
        }
    }

    #[test]
    fn escaping_panic_becomes_typed_error() {
        let config = ExtractionConfig::builder()
            .observer(Arc::new(PanickingObserver))
            .build()
            .unwrap();
        let err = extract("JVBERi0x", &config).unwrap_err();
        assert_eq!(err.to_string(), "PDF text extraction failed: observer exploded");
    }

    #[derive(Default)]
    struct EventLog(Mutex<Vec<String>>);

    impl ExtractionObserver for EventLog {
        fn on_strategy_start(&self, method: Method) {
            self.0.lock().unwrap().push(format!("start:{method}"));
        }
        fn on_strategy_error(&self, method: Method, _error: &str) {
            self.0.lock().unwrap().push(format!("error:{method}"));
        }
        fn on_extraction_complete(&self, outcome: &Outcome) {
            let kind = if outcome.is_fallback() { "fallback" } else { "accepted" };
            self.0.lock().unwrap().push(format!("done:{kind}"));
        }
    }

    #[test]
    fn observer_sees_every_strategy_in_order() {
        let log = Arc::new(EventLog::default());
        let config = ExtractionConfig::builder()
            .observer(log.clone() as Arc<dyn ExtractionObserver>)
            .build()
            .unwrap();
        extract("", &config).unwrap();
        let events = log.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "start:direct",
                "error:direct",
                "start:binary-chunks",
                "error:binary-chunks",
                "start:fallback",
                "error:fallback",
                "start:tj-operator",
                "error:tj-operator",
                "done:fallback",
            ]
        );
    }

    #[test]
    fn panic_message_variants() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let s: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(s.as_ref()), "owned");
        let s: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(s.as_ref()), "unknown panic");
    }

    #[derive(Default)]
    struct ErrorLog(Mutex<Vec<String>>);

    impl ExtractionObserver for ErrorLog {
        fn on_strategy_error(&self, _method: Method, error: &str) {
            self.0.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn panicking_strategy_does_not_stop_the_cascade() {
        let log = Arc::new(ErrorLog::default());
        let config = ExtractionConfig::builder()
            .observer(log.clone() as Arc<dyn ExtractionObserver>)
            .build()
            .unwrap();
        let runner = |method: Method, payload: &str, config: &ExtractionConfig| {
            if method == Method::Direct {
                panic!("direct blew up");
            }
            strategies::run(method, payload, config)
        };

        let output = run_pipeline(&encode_bytes(&resume_pdf()), &config, &runner);

        match output.outcome {
            Outcome::Accepted {
                method: Method::BinaryChunks,
                score: Some(score),
            } => assert!(score >= 0.4, "score {score}"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(output.text.contains("John Smith"));
        // direct panicked; fallback and tj-operator found nothing
        assert_eq!(output.stats.failed_strategies, 3);
        let errors = log.0.lock().unwrap().clone();
        assert_eq!(errors[0], "direct: strategy aborted: direct blew up");
    }

    #[tokio::test]
    async fn async_matches_sync() {
        let b64 = encode_bytes(&resume_pdf());
        let config = ExtractionConfig::default();
        let sync = extract(&b64, &config).unwrap();
        let async_out = extract_async(b64.clone(), &config).await.unwrap();
        assert_eq!(sync.text, async_out.text);
        assert_eq!(sync.outcome, async_out.outcome);
    }

    #[tokio::test]
    async fn generous_timeout_succeeds() {
        let b64 = encode_bytes(&resume_pdf());
        let out = extract_with_timeout(b64, &ExtractionConfig::default(), Duration::from_secs(30))
            .await
            .unwrap();
        assert!(out.text.contains("Software Engineer"));
    }
}
