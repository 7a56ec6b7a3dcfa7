//! # pdf-salvage
//!
//! Recover readable text from a base64-encoded PDF without a PDF parser.
//!
//! ## Why this crate?
//!
//! Browser uploads and stored blobs often reach a backend as a base64 string
//! (frequently a `data:application/pdf;base64,` URL) with no PDF toolchain at
//! hand. Most résumé PDFs keep their text in uncompressed content streams as
//! string literals shown by `Tj`/`TJ` operators, so a set of pattern
//! heuristics over the decoded bytes recovers it surprisingly often. When it
//! does not, callers get a fixed, user-presentable explanation instead of
//! garbage.
//!
//! ## Pipeline Overview
//!
//! ```text
//! base64 / data URL
//!  │
//!  ├─ 1. Input      strip the data-URL header
//!  ├─ 2. Direct     three decoded slices → literals / BT runs / word runs
//!  │                 └─ long and readable? return it
//!  ├─ 3. Scored     binary-chunks, fallback, tj-operator → quality score
//!  ├─ 4. Select     best score ≥ 0.4 → text
//!  └─ 5. Otherwise  FALLBACK_MESSAGE
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pdf_salvage::{extract_text, is_binary_content, is_fallback_message};
//!
//! let upload = "data:application/pdf;base64,JVBERi0xLjQK";
//! if is_binary_content(upload) {
//!     let text = extract_text(upload).unwrap();
//!     if is_fallback_message(&text) {
//!         eprintln!("ask the user for another format");
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-salvage` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{DecodeError, SalvageError, StrategyError};
pub use extract::{
    extract, extract_async, extract_file, extract_from_bytes, extract_text, extract_with_timeout,
    is_fallback_message, FALLBACK_MESSAGE,
};
pub use observer::{ExtractionObserver, NoopObserver, SharedObserver};
pub use output::{Candidate, CandidateReport, ExtractionOutput, ExtractionStats, Method, Outcome};
pub use pipeline::input::is_binary_content;
pub use pipeline::quality::{assess_text_quality, is_readable};
pub use stream::{extract_stream, DocumentResult, DocumentStream};
