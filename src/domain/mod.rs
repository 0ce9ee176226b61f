//! Domain model and deterministic pattern detection.
//!
//! This module contains the entity vocabulary shared across the pipeline and
//! the pattern rules that find structured personal information in raw text.

pub mod entity;
pub mod patterns;

pub use entity::{Category, CategoryFilter, CategoryGroup, Entity, Priority};
pub use patterns::{PatternExtractor, PatternRule};

/// A producer of unresolved entity candidates.
///
/// Sources are independent: none of them sees another's output, and the
/// candidates they return may overlap freely.
pub trait CandidateSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Returns candidates for `text`. Must not fail; a source that cannot
    /// run returns an empty list.
    fn candidates(&self, text: &str) -> Vec<Entity>;
}
