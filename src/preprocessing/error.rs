//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type for preprocessing operations.
///
/// Every failure is fatal for the invocation that raised it: the transform
/// never returns partial output.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// A configured feature key is absent from the input mapping.
    #[error("Missing feature: {0}")]
    MissingFeature(String),
    /// A raw value cannot be interpreted the way the feature's rule requires.
    #[error("Type mismatch for {feature}: expected {expected}, got {got}")]
    TypeMismatch {
        feature: String,
        expected: String,
        got: String,
    },
    /// A column's batch length differs from the batch being transformed.
    #[error("Batch mismatch for {feature}: expected {expected} rows, got {got}")]
    BatchMismatch {
        feature: String,
        expected: usize,
        got: usize,
    },
    /// The analyzed statistics carry no entry for a configured feature.
    #[error("Missing statistic for feature: {0}")]
    MissingStatistic(String),
    /// A stored statistic disagrees with the configuration it is applied under.
    #[error("Statistic mismatch for {feature}: expected {expected}, got {got}")]
    StatisticMismatch {
        feature: String,
        expected: usize,
        got: usize,
    },
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The feature configuration violates a table invariant.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl PreprocessingError {
    pub(crate) fn type_mismatch(
        feature: &str,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        PreprocessingError::TypeMismatch {
            feature: feature.to_string(),
            expected: expected.into(),
            got: got.into(),
        }
    }
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PreprocessingError {
    fn from(err: serde_json::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}
