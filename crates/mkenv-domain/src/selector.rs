//! User-typed version selectors.
//!
//! A selector is either empty (match everything), a plain prefix, or a
//! regular expression introduced by a leading `/`. The raw string is parsed
//! once at the boundary; matching never re-inspects it.

use regex::Regex;
use tracing::debug;

use crate::catalog::CatalogError;

#[derive(Debug, Clone)]
pub enum Selector {
    All,
    Prefix(String),
    Regex(Regex),
}

impl Selector {
    /// Parses the raw CLI selector. Fails only when a `/`-introduced
    /// pattern is not a valid regular expression.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        if raw.is_empty() {
            return Ok(Self::All);
        }
        match raw.strip_prefix('/') {
            Some(pattern) => Regex::new(pattern)
                .map(Self::Regex)
                .map_err(|source| CatalogError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }),
            None => Ok(Self::Prefix(raw.to_string())),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(prefix) => name.starts_with(prefix),
            // Search semantics: a hit anywhere in the name counts.
            Self::Regex(regex) => regex.is_match(name),
        }
    }
}

/// Filters `ordered` down to the names matched by `selector`, preserving
/// order. An empty result is not an error; the caller decides how to
/// report it.
pub fn select(ordered: &[String], selector: &Selector) -> Vec<String> {
    let matched: Vec<String> = ordered
        .iter()
        .filter(|name| selector.matches(name))
        .cloned()
        .collect();
    debug!(
        "selector matched {} of {} installed versions",
        matched.len(),
        ordered.len()
    );
    matched
}
