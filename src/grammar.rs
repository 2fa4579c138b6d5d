//! Identifier grammar resolution for wikilink contents.
//!
//! A link such as `[[1a2 Some Title]]` starts with a structured identifier
//! whose shape is configurable. This module compiles the configured shape
//! into an [`IdPattern`], a validated value type that matches the identifier
//! as a prefix of a link's inner content.
//!
//! # Grammar shapes
//!
//! | [`IdFormat`] | Sub-pattern |
//! |--------------|-------------|
//! | `Folgezettel` | `([0-9]+[a-z0-9-]*)` |
//! | `Timestamp` | `([0-9]{12})` |
//! | `Custom` | user-supplied, must carry one capture group |
//!
//! Whatever the shape, the resolved pattern exposes exactly one capturing
//! group; its match is the identifier.

use std::fmt;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{IdFormat, Settings};

/// Default identifier sub-pattern: leading digits, then letters, digits and
/// hyphens.
pub const FOLGEZETTEL_PATTERN: &str = "([0-9]+[a-z0-9-]*)";

/// Fixed-width timestamp identifiers, e.g. `202403151030`.
pub const TIMESTAMP_PATTERN: &str = "([0-9]{12})";

/// A compiled identifier grammar, anchored at the start of the text it is
/// matched against.
#[derive(Debug, Clone)]
pub struct IdPattern {
    regex: Regex,
}

impl IdPattern {
    /// Compile the grammar selected by `format`.
    ///
    /// The custom sub-pattern is embedded as-is, so it must itself compile
    /// and contain the capturing group that delimits the identifier.
    pub fn compile(format: &IdFormat, custom_pattern: &str) -> Result<IdPattern, PatternError> {
        let sub_pattern = match format {
            IdFormat::Folgezettel => FOLGEZETTEL_PATTERN,
            IdFormat::Timestamp => TIMESTAMP_PATTERN,
            IdFormat::Custom => custom_pattern,
        };

        let regex = Regex::new(&format!("^(?:{sub_pattern})")).map_err(|source| {
            PatternError::Invalid {
                pattern: sub_pattern.to_string(),
                source,
            }
        })?;

        // Group 0 is the whole match; the identifier must be group 1.
        if regex.captures_len() < 2 {
            return Err(PatternError::MissingGroup {
                pattern: sub_pattern.to_string(),
            });
        }

        Ok(IdPattern { regex })
    }

    /// Resolve the grammar from settings.
    ///
    /// An invalid custom pattern is reported and replaced by the folgezettel
    /// grammar for this resolution only; editing is never interrupted.
    pub fn resolve(settings: &Settings) -> IdPattern {
        match IdPattern::compile(&settings.id_format, &settings.custom_pattern) {
            Ok(pattern) => pattern,
            Err(err) => {
                warn!("custom identifier pattern rejected, using folgezettel: {err}");
                IdPattern::folgezettel()
            }
        }
    }

    /// The default folgezettel grammar.
    pub fn folgezettel() -> IdPattern {
        static FOLGEZETTEL: Lazy<IdPattern> = Lazy::new(|| {
            IdPattern::compile(&IdFormat::Folgezettel, FOLGEZETTEL_PATTERN).unwrap()
        });

        FOLGEZETTEL.clone()
    }

    /// Match the identifier prefix of a link's inner content.
    ///
    /// This is an anchored prefix match, not a search; content that merely
    /// contains an identifier somewhere does not qualify.
    pub fn identifier_of<'a>(&self, content: &'a str) -> Option<&'a str> {
        self.regex
            .captures(content)?
            .get(1)
            .map(|id| id.as_str())
    }
}

/// Failure to turn a configured sub-pattern into an identifier grammar.
#[derive(Debug)]
pub enum PatternError {
    /// The sub-pattern does not compile.
    Invalid {
        pattern: String,
        source: regex::Error,
    },
    /// The sub-pattern compiles but captures nothing.
    MissingGroup { pattern: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Invalid { pattern, source } => {
                write!(f, "pattern {pattern:?} does not compile: {source}")
            }
            PatternError::MissingGroup { pattern } => {
                write!(f, "pattern {pattern:?} has no capturing group")
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::Invalid { source, .. } => Some(source),
            PatternError::MissingGroup { .. } => None,
        }
    }
}
