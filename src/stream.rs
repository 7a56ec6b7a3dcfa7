//! Streaming batch API: extract many documents, emitting each as it finishes.
//!
//! A single extraction is synchronous and CPU-bound. For a batch (a folder of
//! uploads, a queue of stored blobs) [`extract_stream`] runs up to
//! `config.concurrency` extractions at once on tokio's blocking pool and
//! yields results in completion order. Sort by [`DocumentResult::index`] if
//! input order matters.

use crate::config::ExtractionConfig;
use crate::error::SalvageError;
use crate::extract::extract;
use crate::output::ExtractionOutput;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::{debug, info};

/// One finished document from a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Position of the document in the input list (0-indexed).
    pub index: usize,
    pub output: ExtractionOutput,
}

/// A boxed stream of per-document results.
pub type DocumentStream = Pin<Box<dyn Stream<Item = Result<DocumentResult, SalvageError>> + Send>>;

/// Extract text from each payload, streaming results as they complete.
///
/// Each item is independent: a failed document yields an `Err` item and the
/// rest of the batch carries on.
///
/// # Example
/// ```rust,no_run
/// use pdf_salvage::{extract_stream, ExtractionConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let payloads = vec!["JVBERi0x...".to_string(), "JVBERi0y...".to_string()];
/// let mut results = extract_stream(payloads, &ExtractionConfig::default());
/// while let Some(item) = results.next().await {
///     match item {
///         Ok(doc) => println!("#{}: {} chars", doc.index, doc.output.text.len()),
///         Err(e) => eprintln!("Error: {e}"),
///     }
/// }
/// # }
/// ```
pub fn extract_stream(inputs: Vec<String>, config: &ExtractionConfig) -> DocumentStream {
    let concurrency = config.concurrency.max(1);
    info!(
        "Starting batch extraction: {} documents, concurrency {}",
        inputs.len(),
        concurrency
    );

    let config = config.clone();
    let s = stream::iter(inputs.into_iter().enumerate().map(move |(index, input)| {
        let cfg = config.clone();
        async move {
            let output = tokio::task::spawn_blocking(move || extract(&input, &cfg))
                .await
                .map_err(|e| {
                    SalvageError::Internal(format!("document {index}: extraction task failed: {e}"))
                })??;
            debug!("Document {} done: {:?}", index, output.outcome);
            Ok::<_, SalvageError>(DocumentResult { index, output })
        }
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}
