//! Attaches journal-catalog metrics to article tables.
//!
//! Every row gets exactly one set of `ENRICHED_*` fields. Matched rows carry
//! the catalog values; rows whose journal is blank or unmatched carry `Null`
//! in every derived field, which keeps "no catalog data" distinguishable from
//! a catalog value of zero. Columns are only appended, rows are never added,
//! removed or reordered. Running the pass again overwrites the derived
//! columns in place.

use std::collections::HashMap;

use lattes_common::{columns, EntityType, Table, Value};
use lattes_ingestion::RecordStore;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{CatalogMetric, MatchKind, ReferenceCatalog};

/// Counts from one enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentReport {
    pub rows: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub unmatched: usize,
    /// Rows without a journal name; no lookup was attempted.
    pub blank_journal: usize,
    /// Tables that already carried derived columns and were overwritten.
    pub reenriched_tables: usize,
}

impl EnrichmentReport {
    pub fn matched(&self) -> usize {
        self.exact + self.fuzzy
    }

    pub fn absorb(&mut self, other: &EnrichmentReport) {
        self.rows += other.rows;
        self.exact += other.exact;
        self.fuzzy += other.fuzzy;
        self.unmatched += other.unmatched;
        self.blank_journal += other.blank_journal;
        self.reenriched_tables += other.reenriched_tables;
    }
}

/// Milestone passed to the progress callback of [`enrich_store`].
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentProgress<'a> {
    pub researcher_id: &'a str,
    pub completed: usize,
    pub total: usize,
}

/// Every derived column name, in the order they are appended.
pub fn enriched_columns() -> Vec<String> {
    CatalogMetric::ALL
        .iter()
        .map(|m| m.enriched_column())
        .chain([
            columns::ENRICHED_QUARTILE.to_string(),
            columns::ENRICHED_CATEGORIES.to_string(),
        ])
        .collect()
}

/// One enrichment pass. Journal lookups are memoised for the lifetime of
/// the pass only.
struct Enricher<'a> {
    catalog: &'a ReferenceCatalog,
    min_score: f64,
    derived: Vec<String>,
    memo: HashMap<String, Option<(usize, MatchKind)>>,
}

impl<'a> Enricher<'a> {
    fn new(catalog: &'a ReferenceCatalog, min_score: f64) -> Self {
        Self {
            catalog,
            min_score,
            derived: enriched_columns(),
            memo: HashMap::new(),
        }
    }

    fn lookup(&mut self, journal: &str) -> Option<(usize, MatchKind)> {
        if let Some(hit) = self.memo.get(journal) {
            return *hit;
        }
        let hit = self.catalog.resolve(journal, self.min_score);
        self.memo.insert(journal.to_string(), hit);
        hit
    }

    fn enrich(&mut self, table: &mut Table) -> EnrichmentReport {
        let mut report = EnrichmentReport {
            rows: table.len(),
            ..Default::default()
        };
        if table.has_column(&self.derived[0]) {
            report.reenriched_tables = 1;
            debug!("Table already enriched, overwriting derived columns");
        }
        for column in &self.derived {
            table.ensure_column(column.as_str());
        }

        for row in table.rows_mut() {
            let journal = row.text(columns::JOURNAL).map(str::to_string);
            let hit = match journal {
                Some(name) => {
                    let hit = self.lookup(&name);
                    match hit {
                        Some((_, MatchKind::Exact)) => report.exact += 1,
                        Some((_, MatchKind::Fuzzy { .. })) => report.fuzzy += 1,
                        None => report.unmatched += 1,
                    }
                    hit
                }
                None => {
                    report.blank_journal += 1;
                    None
                }
            };

            match hit.and_then(|(idx, _)| self.catalog.entry(idx)) {
                Some(entry) => {
                    for (metric, value) in entry.metrics() {
                        let value = Some(value).filter(|v| v.is_finite());
                        row.set(metric.enriched_column(), Value::from(value));
                    }
                    row.set(
                        columns::ENRICHED_QUARTILE,
                        entry.quartile.clone().map_or(Value::Null, Value::Text),
                    );
                    row.set(
                        columns::ENRICHED_CATEGORIES,
                        entry.categories.clone().map_or(Value::Null, Value::Text),
                    );
                }
                None => {
                    for column in &self.derived {
                        row.set(column.as_str(), Value::Null);
                    }
                }
            }
        }
        report
    }
}

/// Enrich one article table in place.
pub fn enrich_table(table: &mut Table, catalog: &ReferenceCatalog, min_score: f64) -> EnrichmentReport {
    Enricher::new(catalog, min_score).enrich(table)
}

/// Enrich the article table of every researcher as one blocking batch.
///
/// `progress` is called once per researcher, after that researcher is done.
pub fn enrich_store(
    store: &mut RecordStore,
    catalog: &ReferenceCatalog,
    min_score: f64,
    mut progress: impl FnMut(EnrichmentProgress<'_>),
) -> EnrichmentReport {
    let total = store.len();
    let mut enricher = Enricher::new(catalog, min_score);
    let mut report = EnrichmentReport::default();

    for (completed, record) in store.researchers_mut().enumerate() {
        if let Some(articles) = record.table_mut(&EntityType::PublishedArticles) {
            let partial = enricher.enrich(articles);
            debug!(researcher = record.id(), rows = partial.rows, matched = partial.matched(), "Enriched articles");
            report.absorb(&partial);
        }
        progress(EnrichmentProgress {
            researcher_id: record.id(),
            completed: completed + 1,
            total,
        });
    }

    info!(
        rows = report.rows,
        exact = report.exact,
        fuzzy = report.fuzzy,
        unmatched = report.unmatched,
        blank_journal = report.blank_journal,
        distinct_journals = enricher.memo.len(),
        "Journal enrichment finished"
    );
    report
}
