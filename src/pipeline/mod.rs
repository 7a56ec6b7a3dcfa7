//! Pipeline stages for text recovery.
//!
//! Each submodule implements one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ decode ──▶ strategies ──▶ quality ──▶ (select in crate::extract)
//! (prefix)  (chunks)   (candidates)   (score)
//! ```
//!
//! 1. [`input`]      — strip the data-URL header; classify raw content
//! 2. [`decode`]     — bounded, lenient base64 decoding with per-chunk `Result`s
//! 3. [`strategies`] — four independent heuristics, each producing one candidate
//! 4. [`quality`]    — continuous score and boolean readability gate
//! 5. [`postprocess`] — literal unescaping, fragment joining, whitespace cleanup

pub mod decode;
pub mod input;
pub mod postprocess;
pub mod quality;
pub mod strategies;
