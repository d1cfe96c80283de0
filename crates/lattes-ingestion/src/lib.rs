//! lattes-ingestion: Loading flat curriculum tables into the record store.
//! - Per-researcher, per-entity tables (`<id>_<ENTITY>.csv`)
//! - Corpus-wide publication view
//! - Table import with replace/merge/abort policy
//! - Title-based deduplication on merge

pub mod dedup;
pub mod loader;
pub mod store;

pub use dedup::{ImportMode, ImportOutcome};
pub use loader::{load_csv_dir, read_table, read_table_file, table_path, write_table, write_table_file};
pub use store::{RecordStore, ResearcherRecord};
