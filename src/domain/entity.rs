//! Entity model shared by every stage of the pipeline.
//!
//! An [`Entity`] is created once by a candidate source and never edited
//! afterwards: resolution selects a subset, filtering selects a subset, and
//! redaction only reads offsets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of personal information an entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Person,
    StudentId,
    Pin,
    Phone,
    Email,
    Address,
    Org,
    Location,
    Misc,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 9] = [
        Category::Person,
        Category::StudentId,
        Category::Pin,
        Category::Phone,
        Category::Email,
        Category::Address,
        Category::Org,
        Category::Location,
        Category::Misc,
    ];

    /// Returns the upper-case label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::StudentId => "STUDENT_ID",
            Self::Pin => "PIN",
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::Address => "ADDRESS",
            Self::Org => "ORG",
            Self::Location => "LOCATION",
            Self::Misc => "MISC",
        }
    }

    /// Returns the user-selectable group this category belongs to.
    ///
    /// `Location` and `Misc` are reported but never selectable for redaction.
    pub fn group(&self) -> Option<CategoryGroup> {
        match self {
            Self::Person => Some(CategoryGroup::Names),
            Self::StudentId | Self::Pin => Some(CategoryGroup::IdsAndPins),
            Self::Address => Some(CategoryGroup::Addresses),
            Self::Phone | Self::Email => Some(CategoryGroup::Contacts),
            Self::Org => Some(CategoryGroup::Organizations),
            Self::Location | Self::Misc => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trust rank of a candidate. Lower values win during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    /// Structural and lexical pattern rules.
    pub const PATTERN: Priority = Priority(1);
    /// Address pattern rules, which are looser than the other patterns.
    pub const PATTERN_ADDRESS: Priority = Priority(2);
    /// Contextual tagger output.
    pub const MODEL: Priority = Priority(3);
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A detected span of personal information.
///
/// `start` and `end` are byte offsets into the source `&str`, half-open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub surface: String,
    pub category: Category,
    pub start: usize,
    pub end: usize,
    pub priority: Priority,
}

impl Entity {
    /// Creates an entity whose surface is the `[start, end)` slice of `text`.
    ///
    /// Callers guarantee that the range lies on character boundaries.
    pub fn from_span(
        text: &str,
        start: usize,
        end: usize,
        category: Category,
        priority: Priority,
    ) -> Self {
        Self {
            surface: text[start..end].to_string(),
            category,
            start,
            end,
            priority,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for a degenerate span.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the two half-open spans share at least one byte.
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Groups of categories a caller can switch on or off as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    Names,
    IdsAndPins,
    Addresses,
    Contacts,
    Organizations,
}

/// Per-group inclusion switches applied between detection and redaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryFilter {
    pub names: bool,
    pub ids: bool,
    pub addresses: bool,
    pub contacts: bool,
    pub organizations: bool,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            names: true,
            ids: true,
            addresses: true,
            contacts: true,
            organizations: false,
        }
    }
}

impl CategoryFilter {
    /// A filter that selects every group.
    pub fn all() -> Self {
        Self {
            names: true,
            ids: true,
            addresses: true,
            contacts: true,
            organizations: true,
        }
    }

    /// A filter that selects nothing.
    pub fn none() -> Self {
        Self {
            names: false,
            ids: false,
            addresses: false,
            contacts: false,
            organizations: false,
        }
    }

    /// Returns whether a group is selected.
    pub fn is_enabled(&self, group: CategoryGroup) -> bool {
        match group {
            CategoryGroup::Names => self.names,
            CategoryGroup::IdsAndPins => self.ids,
            CategoryGroup::Addresses => self.addresses,
            CategoryGroup::Contacts => self.contacts,
            CategoryGroup::Organizations => self.organizations,
        }
    }

    pub fn includes(&self, category: Category) -> bool {
        category.group().is_some_and(|g| self.is_enabled(g))
    }

    /// Keeps the entities whose category is selected, preserving order.
    pub fn apply(&self, entities: &[Entity]) -> Vec<Entity> {
        entities
            .iter()
            .filter(|e| self.includes(e.category))
            .cloned()
            .collect()
    }
}
