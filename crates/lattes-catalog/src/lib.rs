//! lattes-catalog: Journal ranking catalog and publication enrichment.
//! - Tolerant loading of the `;`-delimited ranking table
//! - Exact and fuzzy journal-name lookup
//! - `ENRICHED_*` columns on article tables

pub mod catalog;
pub mod enrichment;
pub mod similarity;

pub use catalog::{load_catalog, CatalogEntry, CatalogMetric, MatchKind, ReferenceCatalog};
pub use enrichment::{enrich_store, enrich_table, EnrichmentProgress, EnrichmentReport};
pub use similarity::{NormalizedLevenshtein, ScorerKind, SequenceRatio, SimilarityScorer};
