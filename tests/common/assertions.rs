//! Custom assertions for redaction testing.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use super::pdf_helpers::pdf_text;
use pii_redactor::{Entity, BLOCK_GLYPH};

/// Asserts that a pattern has been removed from a PDF.
///
/// # Panics
/// Panics if the pattern is still found in the PDF text.
pub fn assert_pdf_redacted(pdf: &[u8], pattern: &str) {
    let text = pdf_text(pdf).unwrap_or_else(|e| panic!("{}", e));
    assert!(
        !text.contains(pattern),
        "Pattern '{}' should be redacted but was found in output PDF.\nExtracted text: {:?}",
        pattern,
        text
    );
}

/// Asserts that a pattern is still present in a PDF.
///
/// # Panics
/// Panics if the pattern is not found in the PDF.
pub fn assert_pdf_preserved(pdf: &[u8], pattern: &str) {
    let text = pdf_text(pdf).unwrap_or_else(|e| panic!("{}", e));
    assert!(
        text.contains(pattern),
        "Pattern '{}' should be preserved but was not found.\nExtracted text: {:?}",
        pattern,
        text
    );
}

/// Asserts that no two entities share a byte.
pub fn assert_non_overlapping(entities: &[Entity]) {
    for (i, a) in entities.iter().enumerate() {
        for b in &entities[i + 1..] {
            assert!(
                !a.overlaps(b),
                "Entities overlap: {:?} and {:?}",
                a,
                b
            );
        }
    }
}

/// Asserts the text redaction contract: same character count, every
/// character inside an entity blocked, every other character unchanged.
pub fn assert_redaction_contract(original: &str, redacted: &str, entities: &[Entity]) {
    assert_eq!(
        original.chars().count(),
        redacted.chars().count(),
        "Redaction changed the character count"
    );

    for ((idx, before), after) in original.char_indices().zip(redacted.chars()) {
        let covered = entities.iter().any(|e| idx >= e.start && idx < e.end);
        if covered {
            assert_eq!(after, BLOCK_GLYPH, "Byte {} should be blocked", idx);
        } else {
            assert_eq!(after, before, "Byte {} should be unchanged", idx);
        }
    }
}
