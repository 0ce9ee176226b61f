//! Document text extraction.
//!
//! Turns an uploaded document into the single text string that detection
//! runs on. PDF pages are extracted one at a time and concatenated in page
//! order; line endings are normalized to `\n` for every input kind.

use crate::error::{RedactorError, RedactorResult};
use std::path::Path;

/// Supported input document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
}

impl DocumentKind {
    /// Infers the kind from the file extension, falling back to the `%PDF-`
    /// magic header.
    pub fn detect(path: Option<&Path>, bytes: &[u8]) -> Self {
        let by_extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"));

        match by_extension {
            Some(true) => Self::Pdf,
            _ if bytes.starts_with(b"%PDF-") => Self::Pdf,
            _ => Self::PlainText,
        }
    }

    /// Returns true for paginated documents that support spatial redaction.
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// Converts CRLF and lone CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Extracts text from `bytes`. `source_name` is only used in errors.
pub fn extract_text(bytes: &[u8], kind: DocumentKind, source_name: &str) -> RedactorResult<String> {
    match kind {
        DocumentKind::PlainText => extract_plain_text(bytes, source_name),
        DocumentKind::Pdf => extract_pdf_text(bytes, source_name),
    }
}

fn extract_plain_text(bytes: &[u8], source_name: &str) -> RedactorResult<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| RedactorError::TextExtraction {
        source_name: source_name.to_string(),
        reason: format!("Input is not valid UTF-8: {}", e),
    })?;
    Ok(normalize_newlines(text))
}

fn extract_pdf_text(bytes: &[u8], source_name: &str) -> RedactorResult<String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| RedactorError::TextExtraction {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                tracing::warn!(
                    page = *page_number,
                    error = %e,
                    "Page text extraction failed; treating page as empty"
                );
            }
        }
    }

    Ok(normalize_newlines(&text))
}
