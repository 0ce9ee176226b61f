//! End-to-end tests of the document pipeline on generated PDFs.

mod common;

use anyhow::Result;
use common::*;
use pii_redactor::{
    CategoryFilter, Category, Detector, DocumentKind, Entity, Priority, RedactionService,
    RedactionStrategy, RedactorError, SpatialRedactor, BLOCK_GLYPH,
};
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use tempfile::TempDir;

/// Helper macro to wrap MuPDF operations with the global lock.
/// This prevents race conditions in MuPDF's font initialization.
macro_rules! with_mupdf_lock {
    ($body:expr) => {{
        let _guard = mupdf_lock();
        $body
    }};
}

fn service() -> RedactionService {
    RedactionService::with_spatial_strategy(Detector::pattern_only())
}

#[test]
fn test_pdf_pipeline_redacts_detected_entities() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_pdf = temp_dir.path().join("report.pdf");
    create_report_pdf(&input_pdf, "Jane Doe", "jane.doe@example.com", "9876543210")?;
    let bytes = fs::read(&input_pdf)?;

    // Sanity check on the fixture itself
    assert_pdf_preserved(&bytes, "jane.doe@example.com");

    let processed = with_mupdf_lock!(service().process_document(
        &bytes,
        DocumentKind::Pdf,
        &CategoryFilter::default(),
        "report.pdf",
    )?);

    let categories: Vec<Category> = processed
        .redacted_entities
        .iter()
        .map(|e| e.category)
        .collect();
    assert!(categories.contains(&Category::Person));
    assert!(categories.contains(&Category::Email));
    assert!(categories.contains(&Category::Phone));

    assert!(!processed.redacted_text.contains("jane.doe@example.com"));
    assert!(processed.redacted_text.contains(BLOCK_GLYPH));

    let document = processed.document.expect("PDF input yields a redacted document");
    assert!(document.result.secure);
    assert!(document.result.instances_redacted >= 3);
    assert_eq!(document.result.pages_processed, 1);
    assert_eq!(document.result.pages_modified, 1);
    assert!(is_valid_pdf(&document.bytes));

    assert_pdf_redacted(&document.bytes, "jane.doe@example.com");
    assert_pdf_redacted(&document.bytes, "9876543210");
    assert_pdf_redacted(&document.bytes, "Jane Doe");
    assert_pdf_preserved(&document.bytes, "milestones");

    Ok(())
}

#[test]
fn test_pdf_pipeline_respects_category_filter() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_pdf = temp_dir.path().join("report.pdf");
    create_report_pdf(&input_pdf, "Jane Doe", "jane.doe@example.com", "9876543210")?;
    let bytes = fs::read(&input_pdf)?;

    let filter = CategoryFilter {
        contacts: false,
        ..CategoryFilter::default()
    };
    let processed = with_mupdf_lock!(service().process_document(
        &bytes,
        DocumentKind::Pdf,
        &filter,
        "report.pdf",
    )?);

    assert!(processed
        .redacted_entities
        .iter()
        .all(|e| e.category == Category::Person));
    assert!(processed.redacted_text.contains("jane.doe@example.com"));

    let document = processed.document.expect("redacted document");
    assert_pdf_redacted(&document.bytes, "Jane Doe");
    assert_pdf_preserved(&document.bytes, "jane.doe@example.com");
    assert_pdf_preserved(&document.bytes, "9876543210");

    Ok(())
}

/// Spatial redaction is by surface string, so every occurrence on the page
/// disappears, including ones the text detector never reported.
#[test]
fn test_spatial_redaction_removes_every_occurrence() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let bytes = TestPdfBuilder::new()
        .with_title("Award Letter")
        .with_name("Jane Doe")
        .with_line("Jane Doe Foundation")
        .build_bytes(temp_dir.path())?;

    let processed = with_mupdf_lock!(service().process_document(
        &bytes,
        DocumentKind::Pdf,
        &CategoryFilter::default(),
        "letter.pdf",
    )?);

    // The text output only blocks the detected header occurrence
    assert_eq!(processed.redacted_entities.len(), 1);
    assert!(processed.redacted_text.contains("Jane Doe Foundation"));

    let document = processed.document.expect("redacted document");
    assert_eq!(document.result.instances_redacted, 2);
    assert_pdf_redacted(&document.bytes, "Jane Doe");
    assert_pdf_preserved(&document.bytes, "Foundation");

    Ok(())
}

/// A surface that is not rendered verbatim on the page is not found.
#[test]
fn test_spatial_redaction_misses_surface_not_on_page() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let bytes = TestPdfBuilder::new()
        .with_title("Memo")
        .with_line("Prepared for Jane Doe")
        .build_bytes(temp_dir.path())?;

    let entity = Entity::from_span("Jane-Doe", 0, 8, Category::Person, Priority::MODEL);
    let document = with_mupdf_lock!(SpatialRedactor::new().redact_document(&bytes, &[entity])?);

    assert_eq!(document.result.instances_redacted, 0);
    assert!(!document.result.has_redactions());
    assert_eq!(document.bytes, bytes);
    assert_pdf_preserved(&document.bytes, "Jane Doe");

    Ok(())
}

#[test]
fn test_pdf_without_entities_is_returned_unchanged() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let bytes = TestPdfBuilder::new()
        .with_title("Minutes")
        .with_line("The meeting started on time.")
        .build_bytes(temp_dir.path())?;

    let processed = with_mupdf_lock!(service().process_document(
        &bytes,
        DocumentKind::Pdf,
        &CategoryFilter::default(),
        "minutes.pdf",
    )?);

    assert!(processed.redacted_entities.is_empty());
    let document = processed.document.expect("redacted document");
    assert_eq!(document.bytes, bytes);
    assert_eq!(document.result.instances_redacted, 0);

    Ok(())
}

#[test]
fn test_spatial_redaction_rejects_malformed_pdf() {
    let entity = Entity::from_span("Jane Doe", 0, 8, Category::Person, Priority::PATTERN);

    let with_entities =
        with_mupdf_lock!(SpatialRedactor::new().redact_document(b"not a pdf", &[entity]));
    assert!(matches!(
        with_entities,
        Err(RedactorError::PdfProcessing { .. })
    ));

    let without_entities = with_mupdf_lock!(SpatialRedactor::new().redact_document(b"not a pdf", &[]));
    assert!(without_entities.is_err());
}

#[test]
fn test_multi_page_pdf_counts_pages() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("two_pages.pdf");

    let (doc, page1, layer1) = PdfDocument::new("Two Pages", Mm(210.0), Mm(297.0), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    doc.get_page(page1)
        .get_layer(layer1)
        .use_text("Chapter one has no personal data", 12.0, Mm(20.0), Mm(270.0), &font);
    let (page2, layer2) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 2");
    doc.get_page(page2)
        .get_layer(layer2)
        .use_text("Contact: jane.doe@example.com", 12.0, Mm(20.0), Mm(270.0), &font);
    doc.save(&mut BufWriter::new(fs::File::create(&path)?))?;
    let bytes = fs::read(&path)?;

    let processed = with_mupdf_lock!(service().process_document(
        &bytes,
        DocumentKind::Pdf,
        &CategoryFilter::default(),
        "two_pages.pdf",
    )?);

    let document = processed.document.expect("redacted document");
    assert_eq!(document.result.pages_processed, 2);
    assert_eq!(document.result.pages_modified, 1);
    assert_pdf_redacted(&document.bytes, "jane.doe@example.com");
    assert_pdf_preserved(&document.bytes, "Chapter one");

    Ok(())
}

#[test]
fn test_plain_text_pipeline_has_no_document() -> Result<()> {
    let processed = service().process_document(
        STUDENT_REPORT.as_bytes(),
        DocumentKind::PlainText,
        &CategoryFilter::default(),
        "report.txt",
    )?;

    assert!(processed.document.is_none());
    assert_redaction_contract(
        STUDENT_REPORT,
        &processed.redacted_text,
        &processed.redacted_entities,
    );
    assert_non_overlapping(&processed.detection.entities);

    for secret in ["Aditee Srivastava", "23BCE11417", "aditee.s@example.com", "9876543210", "4821"] {
        assert!(
            !processed.redacted_text.contains(secret),
            "{} should be redacted",
            secret
        );
    }
    assert!(processed.redacted_text.contains("Lab Report - Semester 5"));

    Ok(())
}
