//! Multi-source entity detection.
//!
//! A [`Detector`] runs every configured [`CandidateSource`] over the same
//! text, pools their candidates and resolves overlaps into one final,
//! non-overlapping entity set.

pub mod model;
pub mod resolver;
pub mod rules;
pub mod tagger;

pub use model::{map_label, ModelAdapter};
pub use resolver::resolve;
pub use rules::{RejectionRule, RuleSet, DEFAULT_DENYLIST};
pub use tagger::{CommandTagger, EntityTagger, SharedTagger, TaggedEntity, TaggerError};

use crate::domain::{CandidateSource, Category, Entity, PatternExtractor};

/// Outcome of one detection run.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Final entity set in resolution order.
    pub entities: Vec<Entity>,

    /// Number of candidates considered before resolution.
    pub candidates: usize,
}

impl Detection {
    /// Number of candidates discarded because they overlapped a winner.
    pub fn discarded(&self) -> usize {
        self.candidates.saturating_sub(self.entities.len())
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity counts per category, in [`Category::ALL`] order, omitting
    /// categories with no entities.
    pub fn counts_by_category(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&category| {
                let count = self
                    .entities
                    .iter()
                    .filter(|e| e.category == category)
                    .count();
                (category, count)
            })
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

/// Combines candidate sources and resolves their output.
pub struct Detector {
    sources: Vec<Box<dyn CandidateSource>>,
}

impl Detector {
    /// Creates a detector that uses pattern rules only.
    pub fn pattern_only() -> Self {
        Self {
            sources: vec![Box::new(PatternExtractor::new())],
        }
    }

    /// Creates a detector with pattern rules followed by the model adapter.
    pub fn with_model(model: ModelAdapter) -> Self {
        Self::pattern_only().with_source(Box::new(model))
    }

    /// Creates a detector from an explicit list of sources.
    pub fn from_sources(sources: Vec<Box<dyn CandidateSource>>) -> Self {
        Self { sources }
    }

    /// Appends a source. Sources are consulted in insertion order.
    pub fn with_source(mut self, source: Box<dyn CandidateSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Detects entities in `text`.
    pub fn detect(&self, text: &str) -> Detection {
        let mut candidates = Vec::new();
        for source in &self.sources {
            let found = source.candidates(text);
            tracing::debug!(source = source.name(), candidates = found.len(), "Source finished");
            candidates.extend(found);
        }

        let considered = candidates.len();
        let entities = resolve(candidates, text.len());
        tracing::info!(
            candidates = considered,
            entities = entities.len(),
            "Detection complete"
        );

        Detection {
            entities,
            candidates: considered,
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::pattern_only()
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("sources", &self.source_names())
            .finish()
    }
}
