//! lattes-analytics: Corpus-wide and per-researcher statistics over loaded
//! curricula, plus the interface to external citation profiles.

pub mod aggregate;
pub mod authors;
pub mod degrees;
pub mod individual;
pub mod profile_provider;
pub mod stats;

pub use aggregate::{growth_rate, AggregationEngine, CorpusStats, DEFAULT_RECENT_WINDOW_YEARS};
pub use authors::{split_authors, AuthorSplitter, DEFAULT_AUTHOR_DELIMITERS};
pub use degrees::{Degree, NOT_INFORMED};
pub use individual::ResearcherProfile;
pub use profile_provider::{fetch_profiles, CitationProfileProvider, ExternalProfile, MockProfileProvider, ProfileLookup};
