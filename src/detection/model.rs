//! Adapter between the contextual tagger and the entity model.

use super::rules::RuleSet;
use super::tagger::{SharedTagger, TaggedEntity};
use crate::domain::{CandidateSource, Category, Entity, Priority};
use std::sync::Arc;

/// Maps a tagger label onto the internal vocabulary.
///
/// IOB prefixes (`B-`, `I-`) are ignored so unaggregated output maps the
/// same way as aggregated output.
pub fn map_label(label: &str) -> Category {
    let label = label
        .strip_prefix("B-")
        .or_else(|| label.strip_prefix("I-"))
        .unwrap_or(label);
    match label {
        "PER" => Category::Person,
        "LOC" => Category::Location,
        "ORG" => Category::Org,
        _ => Category::Misc,
    }
}

/// Character-offset to byte-offset table for one text.
struct CharOffsets(Vec<usize>);

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self(
            text.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(text.len()))
                .collect(),
        )
    }

    fn char_len(&self) -> usize {
        self.0.len() - 1
    }

    /// Converts a half-open character range, clamping the end.
    fn to_bytes(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let end = end.min(self.char_len());
        (start < end).then(|| (self.0[start], self.0[end]))
    }
}

/// Turns tagger output into low-priority candidates.
///
/// Tagger failures never escape: the adapter logs them and returns no
/// candidates, so detection falls back to pattern results alone.
#[derive(Debug, Clone)]
pub struct ModelAdapter {
    tagger: Arc<SharedTagger>,
    rules: RuleSet,
}

impl ModelAdapter {
    /// Creates an adapter with the default rejection rules.
    pub fn new(tagger: Arc<SharedTagger>) -> Self {
        Self {
            tagger,
            rules: RuleSet::default(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Runs the tagger and keeps the accepted entities, in tagger order.
    pub fn extract_model_entities(&self, text: &str) -> Vec<Entity> {
        let tagged = match self.tagger.tag(text) {
            Ok(tagged) => tagged,
            Err(err) => {
                tracing::warn!(error = %err, "Tagger failed; continuing with pattern results only");
                return Vec::new();
            }
        };

        let offsets = CharOffsets::new(text);
        let entities: Vec<Entity> = tagged
            .iter()
            .filter_map(|tag| self.convert(text, &offsets, tag))
            .collect();

        tracing::debug!(
            tagged = tagged.len(),
            accepted = entities.len(),
            "Model entities extracted"
        );
        entities
    }

    fn convert(&self, text: &str, offsets: &CharOffsets, tag: &TaggedEntity) -> Option<Entity> {
        let Some((start, end)) = offsets.to_bytes(tag.start, tag.end) else {
            tracing::debug!(
                word = %tag.word,
                start = tag.start,
                end = tag.end,
                "Dropping tagger record with out-of-range offsets"
            );
            return None;
        };

        // Tighten the span to the trimmed surface so redaction does not
        // swallow neighbouring whitespace.
        let raw = &text[start..end];
        let leading = raw.len() - raw.trim_start().len();
        let surface = raw.trim();
        let start = start + leading;
        let end = start + surface.len();

        let category = map_label(&tag.entity_group);
        if let Some(reason) = self.rules.evaluate(surface, category) {
            tracing::debug!(surface, %category, %reason, "Rejected tagger entity");
            return None;
        }

        Some(Entity::from_span(text, start, end, category, Priority::MODEL))
    }
}

impl CandidateSource for ModelAdapter {
    fn name(&self) -> &str {
        "model"
    }

    fn candidates(&self, text: &str) -> Vec<Entity> {
        self.extract_model_entities(text)
    }
}
