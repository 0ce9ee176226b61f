//! PII detection and redaction for plain text and PDF documents.
//!
//! Detection combines deterministic pattern rules with an external
//! contextual entity tagger, then resolves overlaps between the two into a
//! single non-overlapping entity set. That set drives a length-preserving
//! text redaction and, for PDFs, a spatial redaction that physically removes
//! the matched text using MuPDF.
//!
//! # Architecture
//!
//! - [`domain`]: Entity model and pattern rules
//! - [`detection`]: Tagger contract, model adapter, overlap resolution
//! - [`redaction`]: Text and spatial redaction, document pipeline
//! - [`extraction`]: Document text extraction
//! - [`config`], [`logging`], [`error`]: Ambient concerns
//!
//! # Quick Start
//!
//! ```
//! use pii_redactor::{redact_text, CategoryFilter, Detector};
//!
//! let text = "Submitted by: John Smith, pin is 4821";
//! let detection = Detector::pattern_only().detect(text);
//! let selected = CategoryFilter::default().apply(&detection.entities);
//! let redacted = redact_text(text, &selected);
//!
//! assert_eq!(redacted, "Submitted by: ██████████, pin is ████");
//! ```
//!
//! # Using a contextual tagger
//!
//! ```no_run
//! use pii_redactor::{CommandTagger, Detector, EntityTagger, ModelAdapter, SharedTagger};
//! use std::sync::Arc;
//!
//! let tagger = Arc::new(SharedTagger::lazy(|| {
//!     Ok(Arc::new(CommandTagger::new("python3").with_args(["ner_tagger.py"]))
//!         as Arc<dyn EntityTagger>)
//! }));
//! let detector = Detector::with_model(ModelAdapter::new(tagger));
//! let detection = detector.detect("I met Aditee Srivastava in Pune.");
//! # let _ = detection;
//! ```

pub mod config;
pub mod detection;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod redaction;

pub use config::Config;
pub use detection::{
    resolve, CommandTagger, Detection, Detector, EntityTagger, ModelAdapter, RejectionRule,
    RuleSet, SharedTagger, TaggedEntity, TaggerError,
};
pub use domain::{
    CandidateSource, Category, CategoryFilter, CategoryGroup, Entity, PatternExtractor,
    PatternRule, Priority,
};
pub use error::{RedactorError, RedactorResult};
pub use extraction::{extract_text, DocumentKind};
pub use redaction::{
    redact_text, ProcessedDocument, RedactedDocument, RedactionResult, RedactionService,
    RedactionStrategy, SpatialRedactor, BLOCK_GLYPH,
};

use std::sync::Arc;

/// Builds a detector from configuration.
///
/// With a tagger command configured, the tagger is created lazily on first
/// use and shared by every detection run of the returned detector.
pub fn detector_from_config(config: &Config) -> Detector {
    match config.tagger.command_tagger() {
        Some(tagger) => {
            let shared = SharedTagger::lazy(move || {
                Ok(Arc::new(tagger.clone()) as Arc<dyn EntityTagger>)
            });
            let model = ModelAdapter::new(Arc::new(shared)).with_rules(config.detection.rule_set());
            Detector::with_model(model)
        }
        None => Detector::pattern_only(),
    }
}
