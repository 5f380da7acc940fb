use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Offering period (year + semester name) that partitions all catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermKey {
    pub year: String,
    pub term: String,
}

impl TermKey {
    pub fn new(year: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            term: term.into(),
        }
    }

    /// Derive the term from an ingestion file name.
    ///
    /// Names look like `UF_Feb-21-2025_25_fall_final.json`: the year and term are
    /// the third- and second-to-last `_`-separated tokens. Returns `None` when the
    /// name does not end with `suffix` or has too few tokens.
    pub fn from_filename(path: impl AsRef<Path>, suffix: &str) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?;
        if !name.ends_with(suffix) {
            return None;
        }

        let parts: Vec<&str> = name.split('_').collect();
        if parts.len() < 3 {
            return None;
        }

        let year = parts[parts.len() - 3];
        let term = parts[parts.len() - 2];
        if year.is_empty() || term.is_empty() {
            return None;
        }

        Some(Self::new(year, term))
    }

    /// Directory name of this term's index partition
    pub fn partition_name(&self) -> String {
        format!("courses_{}_{}", self.year, self.term)
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.term)
    }
}
