//! Flat tabular records as produced by the curriculum ingestion step.
//!
//! Each per-researcher entity table is an ordered list of column names plus
//! rows of loosely typed cells. Columns are never guaranteed: reading a
//! column that a row does not carry yields [`Value::Null`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

static NULL: Value = Value::Null;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a cell from raw CSV text. Blank text is `Null`.
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Null` or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(s) => s.trim().is_empty(),
        }
    }

    /// Borrow the text of a `Text` cell. Numbers are not text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// String rendering used for display, export and string comparisons.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }

    /// Year text after normalisation: trimmed, and integral numbers lose
    /// their fractional part (`"2020.0"` and `Number(2020.0)` become
    /// `"2020"`). Blank cells have no year.
    pub fn normalized_year(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        match self {
            Value::Number(n) => Some(format_number(*n)),
            Value::Text(s) => Some(normalize_year_text(s)),
            Value::Null => None,
        }
    }

    /// Year as an integer; non-numeric years are `None`.
    pub fn year(&self) -> Option<i32> {
        self.normalized_year()?.parse::<i32>().ok()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Option<f64>> for Value {
    fn from(n: Option<f64>) -> Self {
        n.map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Normalise free-text years: trim, then drop a zero fraction.
pub fn normalize_year_text(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && !trimmed.contains(['e', 'E']) => {
            format_number(n)
        }
        _ => trimmed.to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One record of a table, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell for `column`, or `Null` when the row does not carry it.
    pub fn get(&self, column: &str) -> &Value {
        self.cells.get(column).unwrap_or(&NULL)
    }

    /// Non-blank text of a cell, trimmed.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column)
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// First non-blank text among several candidate columns.
    pub fn text_any(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|c| self.text(c))
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// An ordered set of columns plus ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut table = Self::new();
        for column in columns {
            table.ensure_column(column);
        }
        table
    }

    /// Build a table from header names and raw CSV records.
    pub fn from_records(headers: &[String], records: impl IntoIterator<Item = Vec<String>>) -> Self {
        let mut table = Self::with_columns(headers.iter().cloned());
        for record in records {
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(h, cell)| (h.clone(), Value::from_cell(cell)))
                .collect();
            table.rows.push(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Append `column` unless already present. Returns whether it was added.
    pub fn ensure_column(&mut self, column: impl Into<String>) -> bool {
        let column = column.into();
        if self.has_column(&column) {
            false
        } else {
            self.columns.push(column);
            true
        }
    }

    /// Append a row. Columns the table has not seen yet are appended in
    /// sorted order so that the column list stays deterministic.
    pub fn push_row(&mut self, row: Row) {
        let mut unseen: Vec<String> = row
            .keys()
            .filter(|k| !self.has_column(k))
            .cloned()
            .collect();
        unseen.sort();
        self.columns.extend(unseen);
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of a column in row order (`Null` where missing).
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |r| r.get(column))
    }

    /// Rows matching `predicate`, keeping the column layout.
    pub fn filtered(&self, mut predicate: impl FnMut(&Row) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Append every row of `other`, merging column lists.
    pub fn append(&mut self, other: Table) {
        for column in other.columns {
            self.ensure_column(column);
        }
        self.rows.extend(other.rows);
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_cells_load_as_null() {
        assert_eq!(Value::from_cell(""), Value::Null);
        assert_eq!(Value::from_cell("   "), Value::Null);
        assert_eq!(Value::from_cell("x"), Value::Text("x".into()));
    }

    #[test]
    fn test_year_normalisation() {
        assert_eq!(Value::from("2020").normalized_year().as_deref(), Some("2020"));
        assert_eq!(Value::from("2020 ").normalized_year().as_deref(), Some("2020"));
        assert_eq!(Value::from("2020.0").normalized_year().as_deref(), Some("2020"));
        assert_eq!(Value::Number(2020.0).normalized_year().as_deref(), Some("2020"));
        assert_eq!(Value::from("s/d").normalized_year().as_deref(), Some("s/d"));
        assert_eq!(Value::Null.normalized_year(), None);
    }

    #[test]
    fn test_year_parsing_excludes_non_numeric() {
        assert_eq!(Value::from(" 2019").year(), Some(2019));
        assert_eq!(Value::from("2019.0").year(), Some(2019));
        assert_eq!(Value::from("in press").year(), None);
        assert_eq!(Value::from("2019.5").year(), None);
        assert_eq!(Value::Null.year(), None);
    }

    #[test]
    fn test_missing_column_reads_as_null() {
        let row: Row = [("ANO", "2020")].into_iter().collect();
        assert!(row.get("REVISTA").is_null());
        assert_eq!(row.text("ANO"), Some("2020"));
    }

    #[test]
    fn test_push_row_extends_columns() {
        let mut table = Table::with_columns(["A"]);
        table.push_row([("A", "1"), ("C", "3"), ("B", "2")].into_iter().collect());
        assert_eq!(table.columns(), &["A".to_string(), "B".to_string(), "C".to_string()]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_append_merges_columns_in_first_seen_order() {
        let mut a = Table::with_columns(["X", "Y"]);
        a.push_row([("X", "1")].into_iter().collect());
        let mut b = Table::with_columns(["Y", "Z"]);
        b.push_row([("Z", "2")].into_iter().collect());
        a.append(b);
        assert_eq!(a.columns(), &["X".to_string(), "Y".to_string(), "Z".to_string()]);
        assert_eq!(a.len(), 2);
    }
}
