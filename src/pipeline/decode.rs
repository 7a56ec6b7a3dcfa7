//! Best-effort, bounded base64 decoding.
//!
//! Work on large payloads is bounded by decoding fixed-size windows rather
//! than the whole document. Every window decode returns its own
//! `Result<String, DecodeError>`; callers filter failures out, so a malformed
//! window never aborts a scan.
//!
//! Decoding is deliberately lenient, matching what a browser's `atob`
//! accepts: ASCII whitespace is ignored, padding is optional and trailing
//! bits are dropped. A window whose length is `1 mod 4` after whitespace
//! removal cannot be decoded and fails.
//!
//! Decoded bytes become chars one-to-one (`0x00..=0xFF` → `U+0000..=U+00FF`),
//! so PDF operators and literal strings survive as text whatever else the
//! bytes hold.

use crate::error::DecodeError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::debug;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode one window of base64 into a Latin-1 string.
pub fn decode_chunk(chunk: &[u8], offset: usize) -> Result<String, DecodeError> {
    let compact: Vec<u8> = chunk
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT
        .decode(&compact)
        .map(|bytes| latin1(&bytes))
        .map_err(|source| DecodeError {
            offset,
            len: chunk.len(),
            source,
        })
}

/// Decode `len` characters of `payload` starting at `start` (clamped).
pub fn decode_window(payload: &str, start: usize, len: usize) -> Result<String, DecodeError> {
    let bytes = payload.as_bytes();
    let start = start.min(bytes.len());
    let end = start.saturating_add(len).min(bytes.len());
    decode_chunk(&bytes[start..end], start)
}

/// Decode the first `limit` characters of `payload` in `chunk_len` windows.
pub fn decode_chunks(
    payload: &str,
    chunk_len: usize,
    limit: usize,
) -> impl Iterator<Item = Result<String, DecodeError>> + '_ {
    let bytes = payload.as_bytes();
    let bytes = &bytes[..limit.min(bytes.len())];
    bytes
        .chunks(chunk_len.max(1))
        .enumerate()
        .map(move |(i, chunk)| {
            let result = decode_chunk(chunk, i * chunk_len);
            if let Err(ref e) = result {
                debug!("Skipping chunk: {}", e);
            }
            result
        })
}

/// Round `offset` down to the start of its 4-character base64 group.
pub fn align_down(offset: usize) -> usize {
    offset - offset % 4
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
