//! Input resolution: normalise a payload and classify raw content.
//!
//! The extraction pipeline works on base64 text. Callers hand it either bare
//! base64, a `data:application/pdf;base64,` URL, raw PDF bytes, or a file on
//! disk holding any of those. Everything here funnels into one `&str`.

use crate::error::SalvageError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// Data-URL header carried by browser `FileReader` output for PDFs.
pub const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

/// Base64 of `%PDF` followed by `-`: every base64-encoded PDF starts with it.
pub const PDF_BASE64_MAGIC: &str = "JVBERi";

/// Strip the PDF data-URL header if present. No other validation.
pub fn normalize(input: &str) -> &str {
    input.strip_prefix(PDF_DATA_URL_PREFIX).unwrap_or(input)
}

/// Cheap pre-check: does this look like an encoded PDF rather than text?
///
/// True when the content starts with the base64 PDF magic, starts with the
/// PDF data-URL header, or its first 100 characters are all base64 symbols.
pub fn is_binary_content(content: &str) -> bool {
    if content.starts_with(PDF_BASE64_MAGIC) || content.starts_with(PDF_DATA_URL_PREFIX) {
        return true;
    }
    let head: Vec<char> = content.chars().take(100).collect();
    !head.is_empty()
        && head
            .iter()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
}

/// Encode raw PDF bytes as the base64 payload the pipeline expects.
pub fn encode_bytes(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} chars base64", bytes.len(), b64.len());
    b64
}

/// Read a document from disk into a payload.
///
/// Files starting with the `%PDF` magic are base64-encoded; anything else is
/// read as text (bare base64 or a data URL) with surrounding whitespace
/// trimmed.
pub fn read_document(path: &Path) -> Result<String, SalvageError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SalvageError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => SalvageError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => SalvageError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if bytes.starts_with(b"%PDF") {
        debug!("Read raw PDF: {} ({} bytes)", path.display(), bytes.len());
        return Ok(encode_bytes(&bytes));
    }

    debug!("Read text payload: {} ({} bytes)", path.display(), bytes.len());
    Ok(String::from_utf8_lossy(&bytes).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_data_url() {
        assert_eq!(normalize("data:application/pdf;base64,JVBERi0x"), "JVBERi0x");
        assert_eq!(normalize("JVBERi0x"), "JVBERi0x");
        assert_eq!(normalize(""), "");
        // Only the PDF header is recognised.
        assert_eq!(
            normalize("data:text/plain;base64,aGVsbG8="),
            "data:text/plain;base64,aGVsbG8="
        );
    }

    #[test]
    fn binary_content_detection() {
        assert!(is_binary_content("JVBERi0xLjQKJcfsj6IKNSAwIG9iago="));
        assert!(is_binary_content("data:application/pdf;base64,AAAA"));
        assert!(is_binary_content("QUJDREVGR0hJSktMTU5PUFFSU1RVVldYWVo="));
        assert!(!is_binary_content(
            "This is plain resume text with experience and skills"
        ));
        assert!(!is_binary_content(""));
    }

    #[test]
    fn binary_check_only_looks_at_head() {
        let mut s = "A".repeat(100);
        s.push_str(" trailing prose with spaces");
        assert!(is_binary_content(&s));
    }

    #[test]
    fn encode_bytes_produces_magic() {
        assert!(encode_bytes(b"%PDF-1.4\n").starts_with(PDF_BASE64_MAGIC));
    }

    #[test]
    fn read_missing_file() {
        let err = read_document(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, SalvageError::FileNotFound { .. }));
    }

    #[test]
    fn read_raw_pdf_and_text_payload() {
        let dir = tempfile::tempdir().unwrap();

        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n1 0 obj\n").unwrap();
        let payload = read_document(&pdf).unwrap();
        assert_eq!(payload, encode_bytes(b"%PDF-1.4\n1 0 obj\n"));

        let txt = dir.path().join("doc.b64");
        std::fs::write(&txt, "  data:application/pdf;base64,JVBERi0x\n").unwrap();
        assert_eq!(
            read_document(&txt).unwrap(),
            "data:application/pdf;base64,JVBERi0x"
        );
    }
}
