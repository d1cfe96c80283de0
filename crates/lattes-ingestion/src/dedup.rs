//! Deduplication of imported rows against an existing table.

use std::collections::HashSet;

use lattes_common::{EntityType, Row, Table};
use serde::Serialize;

/// Policy for importing a table over one that may already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImportMode {
    /// Discard the existing table entirely.
    Replace,
    /// Append incoming rows whose title is not already present.
    Merge,
    /// Leave the store untouched; the caller cancels the import.
    Abort,
}

impl ImportMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Some(ImportMode::Replace),
            "merge"   => Some(ImportMode::Merge),
            "abort"   => Some(ImportMode::Abort),
            _         => None,
        }
    }
}

/// What an import did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportOutcome {
    Replaced { rows: usize },
    Merged { added: usize, skipped: usize },
    Aborted,
}

/// Result of a deduplication check.
#[derive(Debug, PartialEq)]
pub enum DedupResult {
    /// Row is new; append it.
    New,
    /// Row carries a title already present in the target table.
    DuplicateTitle(String),
}

/// Title of a row as stored, without normalisation. Matching on merge is
/// case-sensitive and exact.
pub fn row_title<'a>(row: &'a Row, entity: &EntityType) -> Option<&'a str> {
    entity
        .title_columns()
        .iter()
        .filter_map(|c| row.get(c).as_str())
        .find(|t| !t.trim().is_empty())
}

/// Every title present in `table`.
pub fn existing_titles(table: &Table, entity: &EntityType) -> HashSet<String> {
    table
        .iter()
        .filter_map(|r| row_title(r, entity))
        .map(str::to_string)
        .collect()
}

/// Check a single incoming row. Rows without a title are always new.
pub fn check_duplicate(incoming: &Row, entity: &EntityType, existing: &HashSet<String>) -> DedupResult {
    match row_title(incoming, entity) {
        Some(title) if existing.contains(title) => DedupResult::DuplicateTitle(title.to_string()),
        _ => DedupResult::New,
    }
}

/// Split an incoming batch into rows to append and the number skipped.
pub fn dedup_batch(current: &Table, incoming: Table, entity: &EntityType) -> (Vec<Row>, usize) {
    let existing = existing_titles(current, entity);
    let mut keep = Vec::with_capacity(incoming.len());
    let mut skipped = 0;
    for row in incoming.rows() {
        match check_duplicate(row, entity, &existing) {
            DedupResult::New => keep.push(row.clone()),
            DedupResult::DuplicateTitle(_) => skipped += 1,
        }
    }
    (keep, skipped)
}
