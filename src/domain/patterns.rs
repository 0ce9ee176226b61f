//! Deterministic pattern rules.
//!
//! Each [`PatternRule`] scans the whole text independently and emits
//! high-trust candidates. Rules never consult each other; overlaps between
//! them are settled by the resolver.

use super::entity::{Category, Entity, Priority};
use super::CandidateSource;
use once_cell::sync::Lazy;
use regex::{Match, Regex};

/// One detection rule of the pattern extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternRule {
    /// `Name:`, `Submitted by`, `Dr.` and similar labels followed by a name
    HeaderName,
    /// "I am ..." / "my name is ..."
    SelfIntroduction,
    /// Letters and digits ending in a run of at least four digits
    AlphanumericId,
    /// Digits following pin/otp/code/pass/pwd
    SecretCode,
    /// Ten digits, bare or grouped 3-3-4
    PhoneNumber,
    Email,
    /// Value following the word "address"
    LabeledAddress,
    /// House/flat numbers followed by a sector or pocket number
    AddressFragment,
}

impl PatternRule {
    /// Every rule, in emission order.
    pub const ALL: [PatternRule; 8] = [
        PatternRule::HeaderName,
        PatternRule::SelfIntroduction,
        PatternRule::AlphanumericId,
        PatternRule::SecretCode,
        PatternRule::PhoneNumber,
        PatternRule::Email,
        PatternRule::LabeledAddress,
        PatternRule::AddressFragment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::HeaderName => "header-name",
            Self::SelfIntroduction => "self-introduction",
            Self::AlphanumericId => "alphanumeric-id",
            Self::SecretCode => "secret-code",
            Self::PhoneNumber => "phone-number",
            Self::Email => "email",
            Self::LabeledAddress => "labeled-address",
            Self::AddressFragment => "address-fragment",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::HeaderName | Self::SelfIntroduction => Category::Person,
            Self::AlphanumericId => Category::StudentId,
            Self::SecretCode => Category::Pin,
            Self::PhoneNumber => Category::Phone,
            Self::Email => Category::Email,
            Self::LabeledAddress | Self::AddressFragment => Category::Address,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Self::LabeledAddress | Self::AddressFragment => Priority::PATTERN_ADDRESS,
            _ => Priority::PATTERN,
        }
    }

    /// Returns the compiled regex for this rule.
    pub fn regex(&self) -> &'static Regex {
        static HEADER_NAME: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"\b(?i:name|candidate|student|submitted\s+by|submitted\s+to|prof\.?|dr\.?)[ \t]*[:\-]?\s*((?:Mr\.|Ms\.|Mrs\.|Dr\.)?[ \t]*[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+)",
            )
            .expect("Valid header name regex")
        });
        static SELF_INTRODUCTION: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"\b(?:[Ii][ \t]+am|[Mm]y[ \t]+name[ \t]+is)[ \t]+([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*)",
            )
            .expect("Valid self-introduction regex")
        });
        static ALPHANUMERIC_ID: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b[A-Z0-9]{2,}[0-9]{4,}\b").expect("Valid identifier regex")
        });
        static SECRET_CODE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\b(?:pin|otp|code|pass|pwd)\s*(?:is|:|h|-)?\s*([0-9]{4,8})\b")
                .expect("Valid secret code regex")
        });
        static PHONE_NUMBER: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b[0-9]{10}\b|\b[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}\b")
                .expect("Valid phone number regex")
        });
        static EMAIL: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}")
                .expect("Valid email regex")
        });
        static LABELED_ADDRESS: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\baddress\b[ \t]*[:\-]?[ \t]*([0-9A-Za-z ,\-/]{5,})")
                .expect("Valid labeled address regex")
        });
        static ADDRESS_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\b[0-9]{1,4}[/\-][0-9]{1,4}[\s,]+(?:sector|pkt|pocket)[-\s]?[0-9]+\b")
                .expect("Valid address fragment regex")
        });

        match self {
            Self::HeaderName => &HEADER_NAME,
            Self::SelfIntroduction => &SELF_INTRODUCTION,
            Self::AlphanumericId => &ALPHANUMERIC_ID,
            Self::SecretCode => &SECRET_CODE,
            Self::PhoneNumber => &PHONE_NUMBER,
            Self::Email => &EMAIL,
            Self::LabeledAddress => &LABELED_ADDRESS,
            Self::AddressFragment => &ADDRESS_FRAGMENT,
        }
    }

    /// Index of the capture group holding the value (0 = whole match).
    fn value_group(&self) -> usize {
        match self {
            Self::HeaderName | Self::SelfIntroduction | Self::SecretCode | Self::LabeledAddress => 1,
            _ => 0,
        }
    }

    /// Narrows a match to the span that should be reported, or drops it.
    fn accept(&self, m: Match<'_>) -> Option<(usize, usize)> {
        let value = m.as_str();
        match self {
            Self::AlphanumericId => {
                let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
                let has_digit = value.chars().any(|c| c.is_ascii_digit());
                (has_letter && has_digit).then_some((m.start(), m.end()))
            }
            Self::LabeledAddress => {
                let trimmed = value.trim_end();
                (trimmed.chars().count() > 5).then_some((m.start(), m.start() + trimmed.len()))
            }
            _ => Some((m.start(), m.end())),
        }
    }

    /// Runs this rule over `text`, appending candidates to `out`.
    pub fn apply(&self, text: &str, out: &mut Vec<Entity>) {
        for caps in self.regex().captures_iter(text) {
            let Some(m) = caps.get(self.value_group()) else {
                continue;
            };
            if let Some((start, end)) = self.accept(m) {
                out.push(Entity::from_span(
                    text,
                    start,
                    end,
                    self.category(),
                    self.priority(),
                ));
            }
        }
    }
}

/// Applies an ordered list of pattern rules to raw text.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    rules: Vec<PatternRule>,
}

impl PatternExtractor {
    /// Creates an extractor running every rule.
    pub fn new() -> Self {
        Self {
            rules: PatternRule::ALL.to_vec(),
        }
    }

    /// Creates an extractor running only the given rules, in the given order.
    pub fn with_rules(rules: impl IntoIterator<Item = PatternRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Returns every candidate produced by the configured rules, rule by rule.
    pub fn extract_patterns(&self, text: &str) -> Vec<Entity> {
        let mut candidates = Vec::new();
        for rule in &self.rules {
            let before = candidates.len();
            rule.apply(text, &mut candidates);
            tracing::trace!(
                rule = rule.name(),
                found = candidates.len() - before,
                "Pattern rule applied"
            );
        }
        candidates
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for PatternExtractor {
    fn name(&self) -> &str {
        "patterns"
    }

    fn candidates(&self, text: &str) -> Vec<Entity> {
        self.extract_patterns(text)
    }
}
