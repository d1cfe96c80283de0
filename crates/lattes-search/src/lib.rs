//! lattes-search: Corpus-wide publication search, result filtering and
//! spreadsheet-friendly export.

pub mod export;
pub mod filters;
pub mod index;

pub use export::{export_results, export_results_to_path, EXPORT_COLUMNS};
pub use filters::{apply_filters, filter_results, FilterOutcome, FilterValue, RejectedFilter};
pub use index::{SearchField, SearchIndex};
