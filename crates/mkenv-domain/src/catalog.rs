//! Discovery and preference ordering of installed interpreter distributions.
//!
//! A distribution name is a directory entry under the version manager's
//! `versions` directory, e.g. `3.12.1` or `pypy3.10-7.3.15`. Names are parsed
//! into [`VersionKey`]s and ordered so that the most intuitive default choice
//! comes first: newest CPython release, then alternative implementations
//! grouped by name.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A maximal dot-separated run of digit groups, e.g. `3.6` or `7.3.0`.
/// Hyphens terminate a run, so `pypy3.6-7.3.0` carries two runs.
static VERSION_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)*").expect("version run pattern"));

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("versions directory {0} does not exist - is pyenv installed?")]
    VersionsDirMissing(PathBuf),
    #[error("could not read versions directory {path}")]
    VersionsDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid version pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Sortable representation of a distribution name. Derived once per name,
/// immutable, and total: any string maps to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionKey {
    /// Name starts with a decimal digit, i.e. a plain CPython release.
    pub standard_cpython: bool,
    /// The name with every version run removed; groups alternative
    /// implementations (`pypy-`, `jython-`) lexicographically.
    pub prefix: String,
    /// Every version run in the name, left to right, as integer groups.
    pub numbers: Vec<Vec<u64>>,
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.standard_cpython, other.standard_cpython) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            // Standard CPython: newest (and most specific) release first.
            (true, true) => other
                .numbers
                .cmp(&self.numbers)
                .then_with(|| self.prefix.cmp(&other.prefix)),
            // Alternative implementations: group by name, newest first
            // within a group.
            (false, false) => self
                .prefix
                .cmp(&other.prefix)
                .then_with(|| other.numbers.cmp(&self.numbers)),
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parses a distribution name into its ordering key. Never fails; names
/// without digits simply have no version runs.
pub fn sort_key(name: &str) -> VersionKey {
    let standard_cpython = name.chars().next().is_some_and(|c| c.is_ascii_digit());
    let prefix = VERSION_RUN.replace_all(name, "").into_owned();
    let numbers = VERSION_RUN
        .find_iter(name)
        .map(|run| {
            run.as_str()
                .split('.')
                // Digit groups longer than u64 still compare as "very large".
                .map(|group| group.parse().unwrap_or(u64::MAX))
                .collect()
        })
        .collect();
    VersionKey {
        standard_cpython,
        prefix,
        numbers,
    }
}

/// Lists installed distribution names under `versions_dir`.
///
/// Symlink entries are aliases (`system` and friends), not real installs,
/// and are excluded. Fails when the directory is missing, which usually
/// means the version manager itself is not set up.
pub fn discover_versions(versions_dir: &Path) -> Result<Vec<String>, CatalogError> {
    if !versions_dir.is_dir() {
        return Err(CatalogError::VersionsDirMissing(versions_dir.to_path_buf()));
    }
    let read_error = |source| CatalogError::VersionsDirUnreadable {
        path: versions_dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(versions_dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let file_type = entry.file_type().map_err(read_error)?;
        if file_type.is_symlink() || !file_type.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    debug!("found {} installed versions in {}", names.len(), versions_dir.display());
    Ok(names)
}

/// Returns the input names sorted by preference, best default first.
/// Stable: names with identical keys keep their relative order.
pub fn ordered_list(names: &[String]) -> Vec<String> {
    let mut ordered = names.to_vec();
    ordered.sort_by_cached_key(|name| sort_key(name));
    ordered
}
