//! Journal ranking catalog.
//!
//! Loads the `;`-delimited ranking export (one row per indexed journal) into
//! memory and resolves free-text journal names against it: exact
//! case-insensitive match first, then the single best fuzzy candidate above a
//! similarity threshold.
//!
//! Numeric cells are read through a tolerant converter: blank, unparsable and
//! non-finite values become `0.0` and decimal commas are accepted. Only a
//! file that cannot be opened or framed, or one without a `Title` column,
//! fails the load.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use lattes_common::{columns, LattesError, Result, Value};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::similarity::{SequenceRatio, SimilarityScorer};

/// Default similarity threshold for fuzzy journal matching.
pub const DEFAULT_MIN_SCORE: f64 = 0.85;

pub const TITLE_COLUMN: &str = "Title";
pub const QUARTILE_COLUMN: &str = "SJR Best Quartile";
pub const CATEGORIES_COLUMN: &str = "Categories";

/// The fixed set of numeric quality metrics carried by each journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CatalogMetric {
    Sjr,
    HIndex,
    TotalDocs,
    TotalRefs,
    TotalCites3y,
    CitableDocs3y,
    CitesPerDoc2y,
    RefsPerDoc,
}

impl CatalogMetric {
    pub const ALL: [CatalogMetric; 8] = [
        CatalogMetric::Sjr,
        CatalogMetric::HIndex,
        CatalogMetric::TotalDocs,
        CatalogMetric::TotalRefs,
        CatalogMetric::TotalCites3y,
        CatalogMetric::CitableDocs3y,
        CatalogMetric::CitesPerDoc2y,
        CatalogMetric::RefsPerDoc,
    ];

    /// Column name in the ranking file.
    pub fn source_column(self) -> &'static str {
        match self {
            CatalogMetric::Sjr           => "SJR",
            CatalogMetric::HIndex        => "H index",
            CatalogMetric::TotalDocs     => "Total Docs. (2023)",
            CatalogMetric::TotalRefs     => "Total Refs.",
            CatalogMetric::TotalCites3y  => "Total Cites (3years)",
            CatalogMetric::CitableDocs3y => "Citable Docs. (3years)",
            CatalogMetric::CitesPerDoc2y => "Cites / Doc. (2years)",
            CatalogMetric::RefsPerDoc    => "Ref. / Doc.",
        }
    }

    /// Derived column written on enriched article rows.
    pub fn enriched_column(self) -> String {
        columns::enriched(self.source_column())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Tolerant numeric conversion for catalog cells.
pub fn parse_metric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// One indexed journal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub title: String,
    metrics: [f64; 8],
    pub quartile: Option<String>,
    pub categories: Option<String>,
}

impl CatalogEntry {
    pub fn metric(&self, metric: CatalogMetric) -> f64 {
        self.metrics[metric.index()]
    }

    pub fn metrics(&self) -> impl Iterator<Item = (CatalogMetric, f64)> + '_ {
        CatalogMetric::ALL.into_iter().map(|m| (m, self.metric(m)))
    }
}

/// How a journal name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MatchKind {
    Exact,
    Fuzzy { score: f64 },
}

/// In-memory ranking catalog. Read-only once built.
pub struct ReferenceCatalog {
    entries: Vec<CatalogEntry>,
    /// Case-folded title → first entry with that title.
    exact: HashMap<String, usize>,
    /// Distinct case-folded titles in first-seen order, with their entry.
    candidates: Vec<(String, usize)>,
    scorer: Box<dyn SimilarityScorer>,
}

impl fmt::Debug for ReferenceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceCatalog")
            .field("entries", &self.entries.len())
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl ReferenceCatalog {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            LattesError::CatalogLoad(format!("cannot open {}: {e}", path.display()))
        })?;
        let catalog = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            journals = catalog.len(),
            "Loaded journal ranking catalog"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LattesError::CatalogLoad(format!("unreadable header: {e}")))?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        let column = |name: &str| headers.iter().position(|h| h == name);

        let title_idx = column(TITLE_COLUMN).ok_or_else(|| {
            LattesError::CatalogLoad(format!("missing '{TITLE_COLUMN}' column"))
        })?;

        let metric_idx: Vec<Option<usize>> = CatalogMetric::ALL
            .iter()
            .map(|m| {
                let idx = column(m.source_column());
                if idx.is_none() {
                    warn!(column = m.source_column(), "Catalog column missing, defaulting to 0.0");
                }
                idx
            })
            .collect();
        let quartile_idx = column(QUARTILE_COLUMN);
        let categories_idx = column(CATEGORIES_COLUMN);

        let mut entries = Vec::new();
        let mut untitled = 0usize;
        for result in reader.records() {
            let record = result.map_err(|e| LattesError::CatalogLoad(format!("malformed record: {e}")))?;
            let title = record.get(title_idx).unwrap_or("").trim();
            if title.is_empty() {
                untitled += 1;
                continue;
            }
            let mut metrics = [0.0; 8];
            for (slot, idx) in metrics.iter_mut().zip(&metric_idx) {
                *slot = idx.and_then(|i| record.get(i)).map_or(0.0, parse_metric);
            }
            let text = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            entries.push(CatalogEntry {
                title: title.to_string(),
                metrics,
                quartile: text(quartile_idx),
                categories: text(categories_idx),
            });
        }
        if untitled > 0 {
            debug!(untitled, "Ignored catalog rows without a title");
        }
        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut exact = HashMap::with_capacity(entries.len());
        let mut candidates = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let folded = entry.title.to_lowercase();
            if !exact.contains_key(&folded) {
                exact.insert(folded.clone(), i);
                candidates.push((folded, i));
            }
        }
        Self {
            entries,
            exact,
            candidates,
            scorer: Box::new(SequenceRatio),
        }
    }

    /// Replace the similarity measure used for fuzzy lookups.
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Resolve `name` to an entry index and how it matched.
    ///
    /// Exact case-insensitive equality wins, earliest catalog row first.
    /// Otherwise the single highest-scoring distinct title with a score of
    /// at least `min_score`; equal scores keep the earlier row. This differs
    /// from difflib's `get_close_matches`, which keeps the greatest title.
    pub fn resolve(&self, name: &str, min_score: f64) -> Option<(usize, MatchKind)> {
        let folded = name.to_lowercase();
        if let Some(&idx) = self.exact.get(&folded) {
            return Some((idx, MatchKind::Exact));
        }

        let mut best: Option<(usize, f64)> = None;
        for (title, idx) in &self.candidates {
            let floor = best.map_or(min_score, |(_, s)| s.max(min_score));
            let bound = self.scorer.upper_bound(title, &folded);
            if bound < floor || (best.is_some() && bound <= floor) {
                continue;
            }
            let score = self.scorer.similarity(title, &folded);
            if score < min_score {
                continue;
            }
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((*idx, score)),
            }
        }
        best.map(|(idx, score)| (idx, MatchKind::Fuzzy { score }))
    }

    /// Best catalog entry for a journal name, or `None` when nothing clears
    /// `min_score`.
    pub fn find_best_match(&self, name: &str, min_score: f64) -> Option<&CatalogEntry> {
        self.resolve(name, min_score)
            .and_then(|(idx, _)| self.entries.get(idx))
    }

    /// Like [`find_best_match`](Self::find_best_match) for a table cell.
    /// Only text cells are looked up.
    pub fn find_best_match_value(&self, value: &Value, min_score: f64) -> Option<&CatalogEntry> {
        self.find_best_match(value.as_str()?, min_score)
    }
}

/// Load the catalog, or log and return `None` so that the caller continues
/// without enrichment.
pub fn load_catalog(path: &Path) -> Option<ReferenceCatalog> {
    match ReferenceCatalog::from_path(path) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Journal catalog unavailable, enrichment disabled");
            None
        }
    }
}
