//! Acceptance rules for tagger output.
//!
//! The contextual tagger is noisy on informal text: it tags fillers,
//! role nouns and lowercase words as entities. Each [`RejectionRule`]
//! recognises one such false positive and reports why it was dropped.

use crate::domain::Category;
use std::collections::HashSet;

/// Words the tagger is known to mislabel, compared in lowercase.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "basically",
    "actually",
    "person",
    "student",
    "candidate",
    "engineer",
    "manager",
    "developer",
    "analyst",
    "i",
    "am",
    "an",
    "ai",
    "what",
    "is",
    "do",
    "of",
    "multiple",
    "interests",
    "work",
    "role",
    "bank",
    "pin",
    "report",
    "lab",
    "semester",
];

/// A single predicate over a tagger candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionRule {
    /// Rejects surfaces shorter than the given number of characters.
    MinLength(usize),
    /// Rejects surfaces whose lowercase form is listed.
    Denylist(HashSet<String>),
    /// Rejects person names that do not start with an uppercase letter.
    CapitalizedPerson,
}

impl RejectionRule {
    /// Builds a denylist rule; words are lowercased.
    pub fn denylist<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Denylist(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        )
    }

    /// Returns the reason `surface` is rejected, or `None` if it passes.
    pub fn check(&self, surface: &str, category: Category) -> Option<String> {
        match self {
            Self::MinLength(min) => {
                let len = surface.chars().count();
                (len < *min).then(|| format!("shorter than {} characters", min))
            }
            Self::Denylist(words) => words
                .contains(&surface.to_lowercase())
                .then(|| "listed as a known false positive".to_string()),
            Self::CapitalizedPerson => (category == Category::Person
                && !surface.chars().next().is_some_and(char::is_uppercase))
            .then(|| "person name not capitalized".to_string()),
        }
    }
}

/// Ordered list of rejection rules. The first rule that fires wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RejectionRule>,
}

impl RuleSet {
    /// An empty set that accepts everything.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn new(rules: Vec<RejectionRule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: RejectionRule) {
        self.rules.push(rule);
    }

    pub fn with(mut self, rule: RejectionRule) -> Self {
        self.push(rule);
        self
    }

    pub fn rules(&self) -> &[RejectionRule] {
        &self.rules
    }

    /// Returns the first rejection reason for the candidate.
    pub fn evaluate(&self, surface: &str, category: Category) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.check(surface, category))
    }
}

impl Default for RuleSet {
    /// Minimum length of two, the default denylist, and the capitalization check.
    fn default() -> Self {
        Self::new(vec![
            RejectionRule::MinLength(2),
            RejectionRule::denylist(DEFAULT_DENYLIST),
            RejectionRule::CapitalizedPerson,
        ])
    }
}
