//! Redaction of detected entities and the document pipeline.
//!
//! [`RedactionService`] runs one document end to end: text extraction,
//! detection, category filtering, text redaction, and (for paginated
//! documents) spatial redaction. Each call is independent; a failure aborts
//! only the document being processed.

pub mod spatial;
pub mod strategy;
pub mod text;

pub use spatial::SpatialRedactor;
pub use strategy::{search_terms, RedactedDocument, RedactionResult, RedactionStrategy};
pub use text::{redact_text, BLOCK_GLYPH};

use crate::detection::{Detection, Detector};
use crate::domain::{CategoryFilter, Entity};
use crate::error::RedactorResult;
use crate::extraction::{extract_text, DocumentKind};

/// Everything produced for one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Text the detector ran on
    pub text: String,

    /// Unfiltered detection result
    pub detection: Detection,

    /// Entities selected by the category filter, in detection order
    pub redacted_entities: Vec<Entity>,

    /// `text` with the selected entities blocked out
    pub redacted_text: String,

    /// Spatially redacted document, for paginated inputs
    pub document: Option<RedactedDocument>,
}

/// Redaction service coordinating detection and strategy execution.
pub struct RedactionService {
    detector: Detector,
    strategy: Box<dyn RedactionStrategy>,
}

impl RedactionService {
    /// Creates a new redaction service with the specified strategy.
    pub fn new(detector: Detector, strategy: Box<dyn RedactionStrategy>) -> Self {
        Self { detector, strategy }
    }

    /// Creates a service using MuPDF spatial redaction.
    pub fn with_spatial_strategy(detector: Detector) -> Self {
        Self::new(detector, Box::new(SpatialRedactor::default()))
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn strategy(&self) -> &dyn RedactionStrategy {
        self.strategy.as_ref()
    }

    /// Runs detection only.
    pub fn detect(&self, text: &str) -> Detection {
        self.detector.detect(text)
    }

    /// Detects, filters and text-redacts already extracted text.
    pub fn process_text(&self, text: &str, filter: &CategoryFilter) -> ProcessedDocument {
        let detection = self.detector.detect(text);
        let redacted_entities = filter.apply(&detection.entities);
        let redacted_text = redact_text(text, &redacted_entities);

        tracing::debug!(
            detected = detection.entities.len(),
            selected = redacted_entities.len(),
            "Text redacted"
        );

        ProcessedDocument {
            text: text.to_string(),
            detection,
            redacted_entities,
            redacted_text,
            document: None,
        }
    }

    /// Runs the full pipeline for a document.
    ///
    /// Extraction errors abort before anything is redacted. For paginated
    /// documents the spatial strategy is applied to the original bytes; its
    /// errors abort the document as well, so partial output is never returned.
    pub fn process_document(
        &self,
        bytes: &[u8],
        kind: DocumentKind,
        filter: &CategoryFilter,
        source_name: &str,
    ) -> RedactorResult<ProcessedDocument> {
        tracing::info!(source = source_name, ?kind, "Processing document");

        let text = extract_text(bytes, kind, source_name)?;
        let mut processed = self.process_text(&text, filter);

        if kind.is_paginated() {
            let redacted = self
                .strategy
                .redact_document(bytes, &processed.redacted_entities)?;
            processed.document = Some(redacted);
        }

        Ok(processed)
    }
}

impl std::fmt::Debug for RedactionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedactionService")
            .field("detector", &self.detector)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::error::RedactorError;

    /// Strategy double for inputs that must never reach spatial redaction.
    struct UnreachableStrategy;

    impl RedactionStrategy for UnreachableStrategy {
        fn redact_document(
            &self,
            _document: &[u8],
            _entities: &[Entity],
        ) -> RedactorResult<RedactedDocument> {
            panic!("plain text must not be spatially redacted");
        }

        fn name(&self) -> &str {
            "Unreachable"
        }

        fn is_secure(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_process_text_applies_filter() {
        let service = RedactionService::with_spatial_strategy(Detector::pattern_only());
        let filter = CategoryFilter {
            contacts: false,
            ..CategoryFilter::default()
        };
        let text = "Name: Jane Doe\nEmail: jane@example.com\n";
        let processed = service.process_text(text, &filter);

        assert_eq!(processed.detection.entities.len(), 2);
        assert_eq!(processed.redacted_entities.len(), 1);
        assert_eq!(processed.redacted_entities[0].category, Category::Person);
        assert_eq!(
            processed.redacted_text,
            "Name: ████████\nEmail: jane@example.com\n"
        );
    }

    #[test]
    fn test_plain_text_document_skips_strategy() {
        let service =
            RedactionService::new(Detector::pattern_only(), Box::new(UnreachableStrategy));
        let processed = service
            .process_document(
                b"pin is 4821\r\n",
                DocumentKind::PlainText,
                &CategoryFilter::default(),
                "note.txt",
            )
            .unwrap();

        assert_eq!(processed.text, "pin is 4821\n");
        assert_eq!(processed.redacted_text, "pin is ████\n");
        assert!(processed.document.is_none());
    }

    #[test]
    fn test_extraction_failure_aborts() {
        let service = RedactionService::with_spatial_strategy(Detector::pattern_only());
        let err = service
            .process_document(
                b"%PDF-1.4 not really",
                DocumentKind::Pdf,
                &CategoryFilter::default(),
                "broken.pdf",
            )
            .unwrap_err();
        assert!(matches!(err, RedactorError::TextExtraction { .. }));
    }
}
