//! PDF inspection helpers.

use anyhow::Result;
use pii_redactor::{extract_text, DocumentKind};
use std::sync::{Mutex, MutexGuard};

/// MuPDF has thread-safety issues with font loading, so every test that
/// touches MuPDF holds this lock.
static MUPDF_LOCK: Mutex<()> = Mutex::new(());

/// Acquires the global MuPDF lock, recovering from poisoning by a failed test.
pub fn mupdf_lock() -> MutexGuard<'static, ()> {
    MUPDF_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Extracts text from PDF bytes, returning an error instead of panicking.
pub fn pdf_text(bytes: &[u8]) -> Result<String> {
    extract_text(bytes, DocumentKind::Pdf, "test.pdf")
        .map_err(|e| anyhow::anyhow!("Failed to extract text: {}", e))
}

/// Validates that PDF bytes are loadable and have basic structure.
pub fn is_valid_pdf(bytes: &[u8]) -> bool {
    ::lopdf::Document::load_mem(bytes).is_ok()
}
