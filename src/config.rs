//! TOML configuration.
//!
//! Every section and field is optional; a missing file section falls back
//! to the built-in defaults.
//!
//! ```toml
//! [detection]
//! min_length = 2
//! use_default_denylist = true
//! denylist = ["intern", "mentor"]
//! require_capitalized_person = true
//!
//! [tagger]
//! command = "python3"
//! args = ["ner_tagger.py"]
//!
//! [redaction]
//! max_hits = 100
//!
//! [redaction.categories]
//! names = true
//! organizations = false
//!
//! [logging]
//! level = "info"
//! ```

use crate::detection::{CommandTagger, RejectionRule, RuleSet, DEFAULT_DENYLIST};
use crate::domain::CategoryFilter;
use crate::error::{RedactorError, RedactorResult};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub detection: DetectionConfig,
    pub tagger: TaggerConfig,
    pub redaction: RedactionConfig,
    pub logging: LoggingConfig,
}

/// Acceptance rules for tagger output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    /// Minimum surface length in characters
    pub min_length: usize,
    /// Whether the built-in denylist is applied
    pub use_default_denylist: bool,
    /// Additional words to reject, case-insensitive
    pub denylist: Vec<String>,
    /// Reject person names that do not start with an uppercase letter
    pub require_capitalized_person: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_length: 2,
            use_default_denylist: true,
            denylist: Vec::new(),
            require_capitalized_person: true,
        }
    }
}

impl DetectionConfig {
    /// Builds the rejection rule set described by this section.
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = RuleSet::empty();
        if self.min_length > 0 {
            rules.push(RejectionRule::MinLength(self.min_length));
        }

        let defaults: &[&str] = if self.use_default_denylist {
            DEFAULT_DENYLIST
        } else {
            &[]
        };
        let words: Vec<&str> = defaults
            .iter()
            .copied()
            .chain(self.denylist.iter().map(String::as_str))
            .collect();
        if !words.is_empty() {
            rules.push(RejectionRule::denylist(words));
        }

        if self.require_capitalized_person {
            rules.push(RejectionRule::CapitalizedPerson);
        }
        rules
    }
}

/// External tagger process.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaggerConfig {
    /// Program to run; no tagger is used when absent
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl TaggerConfig {
    /// Returns the configured command tagger, if any.
    pub fn command_tagger(&self) -> Option<CommandTagger> {
        self.command
            .as_ref()
            .map(|program| CommandTagger::new(program.clone()).with_args(self.args.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedactionConfig {
    /// Category groups redacted by default
    pub categories: CategoryFilter,
    /// Maximum search hits per surface per page
    pub max_hits: u32,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            categories: CategoryFilter::default(),
            max_hits: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(contents: &str, origin: &Path) -> RedactorResult<Self> {
        let config: Config = toml::from_str(contents).map_err(|e| RedactorError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RedactorResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents, path)
    }

    fn validate(&self, origin: &Path) -> RedactorResult<()> {
        if self.redaction.max_hits == 0 {
            return Err(RedactorError::Config {
                path: origin.to_path_buf(),
                reason: "redaction.max_hits must be greater than zero".to_string(),
            });
        }
        if matches!(&self.tagger.command, Some(c) if c.trim().is_empty()) {
            return Err(RedactorError::Config {
                path: origin.to_path_buf(),
                reason: "tagger.command must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
