//! Spatial redaction of PDF documents using MuPDF.
//!
//! Entities are located on each page by searching for their surface
//! strings, covered with redaction annotations, and then burned into the
//! page content so the underlying text is physically removed.
//!
//! Because matching is by string rather than by offset, two limitations
//! are inherent:
//! - every occurrence of a surface on a page is removed, including
//!   unrelated ones (over-redaction);
//! - a surface that the page lays out differently (hyphenated or wrapped
//!   across lines) is not found (under-redaction).

use super::strategy::{search_terms, RedactedDocument, RedactionResult, RedactionStrategy};
use crate::domain::Entity;
use crate::error::{RedactorError, RedactorResult};

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfPage};
use mupdf::{Quad, Rect as MuRect};

/// Physically removes entity text from PDFs.
///
/// For each page this strategy:
/// 1. Searches for every entity surface
/// 2. Creates a redaction annotation over each hit's bounding box
/// 3. Applies the page's redactions, removing the covered content
#[derive(Debug, Clone)]
pub struct SpatialRedactor {
    /// Maximum search hits per surface per page
    max_hits: u32,
}

impl SpatialRedactor {
    /// Creates a redactor with default settings.
    pub fn new() -> Self {
        Self { max_hits: 100 }
    }

    /// Sets the maximum number of search hits per surface per page.
    pub fn with_max_hits(mut self, max_hits: u32) -> Self {
        self.max_hits = max_hits;
        self
    }

    pub fn max_hits(&self) -> u32 {
        self.max_hits
    }

    /// Marks and applies redactions on every page for the given terms.
    fn apply_mupdf_redactions(
        &self,
        pdf_doc: &PdfDocument,
        terms: &[String],
    ) -> RedactorResult<RedactionResult> {
        let page_count = pdf_doc
            .page_count()
            .map_err(|e| RedactorError::mupdf("Failed to get page count", e))?;

        let mut result = RedactionResult {
            pages_processed: page_count as usize,
            secure: true,
            ..Default::default()
        };

        for page_idx in 0..page_count {
            let page_no = page_idx as usize + 1;
            let page = pdf_doc
                .load_page(page_idx)
                .map_err(|e| RedactorError::PdfProcessing {
                    message: format!("Failed to load page {}", page_no),
                    page: Some(page_no),
                    source: Some(Box::new(e)),
                })?;

            let mut pdf_page = match PdfPage::try_from(page.clone()) {
                Ok(p) => p,
                Err(_) => continue, // Skip non-PDF pages
            };

            let mut page_redactions = 0;

            for term in terms {
                let hits = page.search(term, self.max_hits).map_err(|e| {
                    RedactorError::mupdf(format!("Search failed on page {}", page_no), e)
                })?;

                for quad in hits {
                    let annot = pdf_page
                        .create_annotation(PdfAnnotationType::Redact)
                        .map_err(|e| RedactorError::PdfProcessing {
                            message: "Failed to create redaction annotation".to_string(),
                            page: Some(page_no),
                            source: Some(Box::new(e)),
                        })?;

                    unsafe {
                        ffi::set_annotation_rect(&annot, bounding_rect(&quad));
                    }

                    page_redactions += 1;
                }
            }

            if page_redactions > 0 {
                pdf_page
                    .redact()
                    .map_err(|e| RedactorError::PdfProcessing {
                        message: format!("Failed to apply redactions on page {}", page_no),
                        page: Some(page_no),
                        source: Some(Box::new(e)),
                    })?;

                tracing::debug!(page = page_no, regions = page_redactions, "Page redacted");
                result.instances_redacted += page_redactions;
                result.pages_modified += 1;
            }
        }

        Ok(result)
    }

    /// Serializes the document through a temporary file.
    fn save_to_bytes(pdf_doc: &PdfDocument) -> RedactorResult<Vec<u8>> {
        let tmp = tempfile::Builder::new()
            .prefix("pii-redactor-")
            .suffix(".pdf")
            .tempfile()?;
        let path = tmp.path();
        let path_str = path.to_str().ok_or_else(|| RedactorError::InvalidInput {
            parameter: "temporary path".to_string(),
            reason: "Path contains invalid UTF-8".to_string(),
        })?;

        pdf_doc
            .save(path_str)
            .map_err(|e| RedactorError::PdfProcessing {
                message: "Failed to save redacted PDF".to_string(),
                page: None,
                source: Some(Box::new(e)),
            })?;

        std::fs::read(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Default for SpatialRedactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned box enclosing a search hit.
fn bounding_rect(quad: &Quad) -> MuRect {
    MuRect {
        x0: quad.ul.x.min(quad.ll.x).min(quad.ur.x).min(quad.lr.x),
        y0: quad.ul.y.min(quad.ll.y).min(quad.ur.y).min(quad.lr.y),
        x1: quad.ul.x.max(quad.ll.x).max(quad.ur.x).max(quad.lr.x),
        y1: quad.ul.y.max(quad.ll.y).max(quad.ur.y).max(quad.lr.y),
    }
}

impl RedactionStrategy for SpatialRedactor {
    fn redact_document(
        &self,
        document: &[u8],
        entities: &[Entity],
    ) -> RedactorResult<RedactedDocument> {
        let pdf_doc = PdfDocument::from_bytes(document).map_err(|e| RedactorError::PdfProcessing {
            message: "Failed to open PDF with MuPDF".to_string(),
            page: None,
            source: Some(Box::new(e)),
        })?;

        let terms = search_terms(entities);
        if terms.is_empty() {
            return Ok(RedactedDocument {
                bytes: document.to_vec(),
                result: RedactionResult::none(),
            });
        }

        let result = self.apply_mupdf_redactions(&pdf_doc, &terms)?;
        tracing::info!(
            pages = result.pages_processed,
            pages_modified = result.pages_modified,
            regions = result.instances_redacted,
            "Spatial redaction complete"
        );

        let bytes = if result.has_redactions() {
            Self::save_to_bytes(&pdf_doc)?
        } else {
            document.to_vec()
        };

        Ok(RedactedDocument { bytes, result })
    }

    fn name(&self) -> &str {
        "SpatialRedaction"
    }

    fn is_secure(&self) -> bool {
        true
    }
}

/// FFI helpers for MuPDF annotation operations.
mod ffi {
    use mupdf::pdf::PdfAnnotation;
    use mupdf::Rect;

    /// Sets the rectangle for a PDF annotation via FFI.
    ///
    /// # Safety
    /// The annotation must be valid and belong to a live document.
    pub unsafe fn set_annotation_rect(annot: &PdfAnnotation, rect: Rect) {
        #[repr(C)]
        struct PdfAnnotRaw {
            inner: *mut mupdf_sys::pdf_annot,
        }

        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        let ctx = mupdf_sys::mupdf_new_base_context();

        if !ctx.is_null() {
            let fz_rect = mupdf_sys::fz_rect {
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            };

            mupdf_sys::pdf_set_annot_rect(ctx, annot_raw.inner, fz_rect);
            mupdf_sys::mupdf_drop_base_context(ctx);
        }
    }
}
