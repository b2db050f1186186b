use thiserror::Error;

use crate::validation::ValidationResult;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("feature '{0}' is listed in feature_order but has no descriptor")]
    MissingDescriptor(String),

    #[error("feature '{0}' appears more than once in feature_order")]
    DuplicateFeature(String),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("a submission is already in flight")]
    Busy,

    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(ValidationResult),
}
