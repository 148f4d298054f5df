use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk corpus directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Corpus directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// Nothing to analyze; averages and rankings are undefined
    #[error("No documents found in corpus")]
    EmptyCorpus,

    #[error("Duplicate document name: {0}")]
    DuplicateDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config {path}: {error}")]
    ConfigParse {
        path: PathBuf,
        error: toml::de::Error,
    },

    #[error("Similarity error: {0}")]
    Similarity(#[from] skill_similarity::SimilarityError),

    #[error("Budget error: {0}")]
    Budget(#[from] skill_budget::BudgetError),

    #[error("Capability error: {0}")]
    Capability(#[from] skill_capability::CapabilityError),
}

impl AuditError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}
