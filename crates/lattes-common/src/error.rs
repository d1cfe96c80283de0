use thiserror::Error;

#[derive(Debug, Error)]
pub enum LattesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    #[error("Researcher not found: {0}")]
    ResearcherNotFound(String),

    #[error("Invalid filter '{name}': {reason}")]
    InvalidFilter { name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LattesError>;
