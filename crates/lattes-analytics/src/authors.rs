//! Author-list parsing for collaboration statistics.
//!
//! Author strings in curricula use whatever separator the researcher typed.
//! The splitter tries an ordered list of delimiters and uses the first one
//! that occurs in the string; a string with none of them is one author.

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTHOR_DELIMITERS: [&str; 4] = [";", ",", " and ", " e "];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSplitter {
    delimiters: Vec<String>,
}

impl Default for AuthorSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHOR_DELIMITERS.iter().map(|d| d.to_string()).collect())
    }
}

impl AuthorSplitter {
    /// Empty delimiters are ignored.
    pub fn new(delimiters: Vec<String>) -> Self {
        Self {
            delimiters: delimiters.into_iter().filter(|d| !d.is_empty()).collect(),
        }
    }

    pub fn delimiters(&self) -> &[String] {
        &self.delimiters
    }

    pub fn split(&self, raw: &str) -> Vec<String> {
        split_authors(raw, &self.delimiters)
    }

    /// Number of author mentions in `raw`.
    pub fn count(&self, raw: &str) -> usize {
        self.split(raw).len()
    }
}

/// Split an author list on the first delimiter of `delimiters` that occurs
/// in it. Pieces are trimmed and empty pieces dropped; blank input yields no
/// authors.
pub fn split_authors<S: AsRef<str>>(raw: &str, delimiters: &[S]) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let delimiter = delimiters.iter().map(|d| d.as_ref()).find(|d| raw.contains(*d));
    let pieces: Vec<&str> = match delimiter {
        Some(delimiter) => raw.split(delimiter).collect(),
        None => vec![raw],
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
