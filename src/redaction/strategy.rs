//! Spatial redaction strategy trait and supporting types.
//!
//! A strategy takes a paginated document and the entities to hide, and
//! returns a new document in which their surface strings are gone.

use crate::domain::Entity;
use crate::error::RedactorResult;

/// Statistics about a spatial redaction operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionResult {
    /// Number of regions redacted
    pub instances_redacted: usize,

    /// Pages processed
    pub pages_processed: usize,

    /// Pages with redactions
    pub pages_modified: usize,

    /// Whether text was physically removed (vs visually obscured)
    pub secure: bool,
}

impl RedactionResult {
    /// Creates a result indicating no redactions were needed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.instances_redacted > 0
    }
}

/// A redacted document and what was done to it.
#[derive(Debug, Clone)]
pub struct RedactedDocument {
    pub bytes: Vec<u8>,
    pub result: RedactionResult,
}

/// Strategy for hiding entities in a paginated document.
///
/// Paginated documents do not share the offset space of the extracted text,
/// so strategies locate entities by their surface string, not by offsets.
pub trait RedactionStrategy: Send + Sync {
    /// Redacts every occurrence of each entity's surface string.
    fn redact_document(
        &self,
        document: &[u8],
        entities: &[Entity],
    ) -> RedactorResult<RedactedDocument>;

    /// Returns a human-readable name for this strategy.
    fn name(&self) -> &str;

    /// Returns whether this strategy provides secure (physical) deletion.
    fn is_secure(&self) -> bool;
}

/// Returns the distinct trimmed, non-empty surfaces of `entities`,
/// in first-seen order.
pub fn search_terms(entities: &[Entity]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for entity in entities {
        let term = entity.surface.trim();
        if !term.is_empty() && !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}
