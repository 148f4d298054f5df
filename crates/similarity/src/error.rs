use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimilarityError>;

#[derive(Error, Debug)]
pub enum SimilarityError {
    /// Weight is negative, NaN or infinite
    #[error("Invalid weight for field {field}: {weight}")]
    InvalidWeight { field: String, weight: f64 },

    /// Same field listed twice
    #[error("Duplicate weight for field {0}")]
    DuplicateField(String),

    /// Nothing to compare
    #[error("Weights must contain at least one positive entry")]
    NoWeights,

    /// Two documents share a name
    #[error("Duplicate document name: {0}")]
    DuplicateDocument(String),

    /// Threshold ordering is broken
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
}
