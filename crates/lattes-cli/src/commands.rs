//! Command implementations behind the `lattes` binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use lattes_analytics::{AggregationEngine, AuthorSplitter, CorpusStats, ResearcherProfile};
use lattes_catalog::{enrich_store, load_catalog, EnrichmentReport, ReferenceCatalog};
use lattes_common::{EntityType, LattesError, Table};
use lattes_ingestion::{
    load_csv_dir, read_table_file, table_path, write_table_file, ImportMode, ImportOutcome, RecordStore,
};
use lattes_search::filters::{FILTER_CATEGORIES, FILTER_H_INDEX, FILTER_SJR, FILTER_YEAR};
use lattes_search::{apply_filters, export_results_to_path, FilterValue, SearchIndex};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Loaded, enriched corpus plus the settings it was loaded with.
pub struct Session {
    pub config: Config,
    pub store: RecordStore,
    /// `None` when the catalog could not be loaded; the corpus is then
    /// analysed without journal metrics.
    pub enrichment: Option<EnrichmentReport>,
}

impl Session {
    pub fn open(config: Config) -> anyhow::Result<Self> {
        let mut store = load_csv_dir(&config.data.csv_dir)
            .with_context(|| format!("Failed to load curricula from {}", config.data.csv_dir.display()))?;

        let enrichment = match open_catalog(&config) {
            Some(catalog) => {
                let report = enrich_store(&mut store, &catalog, config.matching.min_score, |p| {
                    debug!(researcher = p.researcher_id, completed = p.completed, total = p.total, "Enrichment progress");
                });
                Some(report)
            }
            None => None,
        };

        Ok(Self {
            config,
            store,
            enrichment,
        })
    }

    pub fn engine(&self) -> AggregationEngine {
        let analytics = &self.config.analytics;
        let engine = match analytics.reference_year {
            Some(year) => AggregationEngine::new(year),
            None => AggregationEngine::default(),
        };
        engine
            .with_recent_window(analytics.recent_window_years)
            .with_splitter(AuthorSplitter::new(analytics.author_delimiters.clone()))
    }
}

fn open_catalog(config: &Config) -> Option<ReferenceCatalog> {
    let catalog = load_catalog(&config.data.catalog_path)?;
    let catalog = catalog.with_scorer(config.matching.scorer.build());
    info!(
        path = %config.data.catalog_path.display(),
        journals = catalog.len(),
        scorer = catalog.scorer_name(),
        "Journal catalog loaded"
    );
    Some(catalog)
}

pub fn corpus_stats(session: &Session) -> CorpusStats {
    session.engine().analyze_corpus(&session.store)
}

pub fn researcher_profile(session: &Session, id: &str) -> anyhow::Result<ResearcherProfile> {
    session
        .engine()
        .analyze_researcher(&session.store, id)
        .ok_or_else(|| LattesError::ResearcherNotFound(id.to_string()).into())
}

/// Filter flags as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub sjr: Option<String>,
    pub h_index: Option<String>,
    pub category: Option<String>,
    pub year: Option<String>,
    /// Reject the search when any filter is invalid instead of skipping it.
    pub strict: bool,
}

/// `"min:max"` as a range. Anything else stays text, which the range
/// filters reject.
pub fn parse_range(raw: &str) -> FilterValue {
    let parsed = raw
        .split_once(':')
        .and_then(|(lo, hi)| Some((lo.trim().parse::<f64>().ok()?, hi.trim().parse::<f64>().ok()?)));
    match parsed {
        Some((lo, hi)) => FilterValue::Range(lo, hi),
        None => FilterValue::Text(raw.to_string()),
    }
}

impl FilterArgs {
    pub fn to_filters(&self) -> BTreeMap<String, FilterValue> {
        let mut filters = BTreeMap::new();
        if let Some(sjr) = &self.sjr {
            filters.insert(FILTER_SJR.to_string(), parse_range(sjr));
        }
        if let Some(h) = &self.h_index {
            filters.insert(FILTER_H_INDEX.to_string(), parse_range(h));
        }
        if let Some(category) = &self.category {
            filters.insert(FILTER_CATEGORIES.to_string(), FilterValue::Text(category.clone()));
        }
        if let Some(year) = &self.year {
            filters.insert(FILTER_YEAR.to_string(), FilterValue::Text(year.clone()));
        }
        filters
    }
}

/// Search one field, then narrow the hits with the given filters.
pub fn search(session: &Session, query: &str, field: &str, filter_args: &FilterArgs) -> anyhow::Result<Table> {
    let index = SearchIndex::build(&session.store);
    let Some(hits) = index.search_by_criteria(query, field) else {
        anyhow::bail!(
            "Nothing to search for query {query:?} on field {field:?}: the query is blank, the field is \
             unknown (title, issn, doi, year) or there are no publications with that field"
        );
    };

    let filters = filter_args.to_filters();
    if filters.is_empty() {
        return Ok(hits);
    }
    let outcome = apply_filters(&hits, &filters);
    if filter_args.strict {
        return Ok(outcome.into_strict()?);
    }
    for rejected in &outcome.rejected {
        warn!(filter = %rejected.name, reason = %rejected.reason, "Filter ignored");
    }
    Ok(outcome.table)
}

/// Export search hits to `path`, or to the configured export path.
pub fn export(session: &Session, results: &Table, path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = path.map_or_else(|| session.config.export.path.clone(), Path::to_path_buf);
    export_results_to_path(results, &path)?;
    Ok(path)
}

/// Import `file` as the `entity` table of researcher `id` and write the
/// resulting table back into the CSV directory.
pub fn import(config: &Config, id: &str, entity: &str, file: &Path, mode: ImportMode) -> anyhow::Result<ImportOutcome> {
    let entity = EntityType::parse(entity);
    let incoming = read_table_file(file)?;
    let mut store = load_csv_dir(&config.data.csv_dir)
        .with_context(|| format!("Failed to load curricula from {}", config.data.csv_dir.display()))?;

    let outcome = store.import_or_merge(id, entity.clone(), incoming, mode);
    if outcome == ImportOutcome::Aborted {
        return Ok(outcome);
    }
    if let Some(table) = store.get(id, &entity) {
        let path = table_path(&config.data.csv_dir, id, &entity);
        write_table_file(table, &path)?;
        info!(path = %path.display(), rows = table.len(), "Saved imported table");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0.5:2"), FilterValue::Range(0.5, 2.0));
        assert_eq!(parse_range(" 1 : 10 "), FilterValue::Range(1.0, 10.0));
        assert_eq!(parse_range("high"), FilterValue::Text("high".into()));
        assert_eq!(parse_range("1:x"), FilterValue::Text("1:x".into()));
    }

    #[test]
    fn test_filter_args_map_to_filter_names() {
        let args = FilterArgs {
            sjr: Some("1:5".into()),
            year: Some("2020".into()),
            ..Default::default()
        };
        let filters = args.to_filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters["SJR"], FilterValue::Range(1.0, 5.0));
        assert_eq!(filters["Year"], FilterValue::Text("2020".into()));
    }
}
