//! Narrowing of search results by catalog metrics, category and year.
//!
//! Filtering is permissive: a filter with an unknown name, a value of the
//! wrong shape, an inverted range, a blank value, or a column the table does
//! not carry is skipped rather than failing the whole call. Skipped filters
//! are reported in [`FilterOutcome::rejected`]; callers that want invalid
//! filters to be errors use [`FilterOutcome::into_strict`].

use std::collections::BTreeMap;

use lattes_common::table::normalize_year_text;
use lattes_common::{columns, LattesError, Result, Row, Table, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const FILTER_SJR: &str = "SJR";
pub const FILTER_H_INDEX: &str = "H index";
pub const FILTER_CATEGORIES: &str = "Categories";
pub const FILTER_YEAR: &str = "Year";

/// Value supplied for a named filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Inclusive `(min, max)` bounds.
    Range(f64, f64),
    Number(f64),
    Text(String),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<(f64, f64)> for FilterValue {
    fn from((min, max): (f64, f64)) -> Self {
        FilterValue::Range(min, max)
    }
}

/// A filter that was not applied, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedFilter {
    pub name: String,
    pub reason: String,
}

/// Filtered rows plus the bookkeeping of which filters took effect.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub table: Table,
    pub applied: Vec<String>,
    pub rejected: Vec<RejectedFilter>,
}

impl FilterOutcome {
    /// The filtered table, or an error naming the first rejected filter.
    pub fn into_strict(self) -> Result<Table> {
        match self.rejected.into_iter().next() {
            Some(RejectedFilter { name, reason }) => Err(LattesError::InvalidFilter { name, reason }),
            None => Ok(self.table),
        }
    }
}

enum Filter {
    Range { column: &'static str, min: f64, max: f64 },
    Categories(String),
    Year(String),
}

impl Filter {
    fn parse(name: &str, value: &FilterValue, table: &Table) -> std::result::Result<Self, String> {
        let filter = match name {
            FILTER_SJR | FILTER_H_INDEX => {
                let column = if name == FILTER_SJR {
                    columns::ENRICHED_SJR
                } else {
                    columns::ENRICHED_H_INDEX
                };
                let FilterValue::Range(min, max) = *value else {
                    return Err("expected a (min, max) range".to_string());
                };
                if min.is_nan() || max.is_nan() || min > max {
                    return Err(format!("malformed range ({min}, {max})"));
                }
                Filter::Range { column, min, max }
            }
            FILTER_CATEGORIES => match value {
                FilterValue::Text(s) if !s.trim().is_empty() => Filter::Categories(s.to_lowercase()),
                FilterValue::Text(_) => return Err("blank value".to_string()),
                _ => return Err("expected text".to_string()),
            },
            FILTER_YEAR => {
                let year = match value {
                    FilterValue::Text(s) => normalize_year_text(s),
                    FilterValue::Number(n) => Value::Number(*n).to_display_string(),
                    FilterValue::Range(..) => return Err("expected a single year".to_string()),
                };
                if year.is_empty() {
                    return Err("blank value".to_string());
                }
                Filter::Year(year)
            }
            _ => return Err("unknown filter".to_string()),
        };

        let column = filter.column();
        if !table.has_column(column) {
            return Err(format!("column {column} not present"));
        }
        Ok(filter)
    }

    fn column(&self) -> &'static str {
        match self {
            Filter::Range { column, .. } => column,
            Filter::Categories(_) => columns::ENRICHED_CATEGORIES,
            Filter::Year(_) => columns::YEAR,
        }
    }

    fn keeps(&self, row: &Row) -> bool {
        let cell = row.get(self.column());
        match self {
            Filter::Range { min, max, .. } => cell
                .as_f64()
                .is_some_and(|v| v >= *min && v <= *max),
            Filter::Categories(needle) => cell.to_display_string().to_lowercase().contains(needle),
            Filter::Year(year) => cell.normalized_year().as_deref() == Some(year.as_str()),
        }
    }
}

/// Apply every filter in `filters` and report which were skipped.
pub fn apply_filters(table: &Table, filters: &BTreeMap<String, FilterValue>) -> FilterOutcome {
    let mut active = Vec::new();
    let mut outcome = FilterOutcome::default();

    for (name, value) in filters {
        match Filter::parse(name, value, table) {
            Ok(filter) => {
                active.push(filter);
                outcome.applied.push(name.clone());
            }
            Err(reason) => {
                debug!(filter = %name, %reason, "Skipping filter");
                outcome.rejected.push(RejectedFilter {
                    name: name.clone(),
                    reason,
                });
            }
        }
    }

    outcome.table = table.filtered(|row| active.iter().all(|f| f.keeps(row)));
    outcome
}

/// Permissive filtering: invalid filters are ignored.
pub fn filter_results(table: &Table, filters: &BTreeMap<String, FilterValue>) -> Table {
    apply_filters(table, filters).table
}
