//! Core traits for the two-phase transforms.
//!
//! Every transform that needs a corpus-wide statistic is split in two:
//! - [`Analyzer`]: the analyze phase. Holds hyperparameters and makes one
//!   full pass over a corpus column to compute the statistic.
//! - [`FittedTransformer`]: the apply phase. Holds the computed statistic,
//!   applies it to any batch, and can be persisted between the phases.

use crate::backend::Backend;
use crate::features::RawColumn;
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Trait for the analyze phase of a transform.
///
/// # Type Parameters
/// - `B`: The backend (e.g., `CpuBackend`) that holds the transform output.
///
/// # Example
/// ```ignore
/// use clinical_transform::preprocessing::{Analyzer, FittedTransformer, MinMaxScaler};
/// use clinical_transform::backend::CpuBackend;
///
/// let scaler = MinMaxScaler::<CpuBackend>::new();
/// let fitted = scaler.analyze("age", &corpus_column)?;
/// let scaled = fitted.apply("age", &batch_column)?;
/// ```
pub trait Analyzer<B: Backend>: Clone {
    /// Output produced by the fitted transformer.
    type Output;
    /// Serializable representation of the computed statistic.
    type Params: SerializableParams;
    /// The fitted transformer type ready for the apply phase.
    type Fitted: FittedTransformer<B, Params = Self::Params, Output = Self::Output>;

    /// Compute the statistic over the full corpus column of `feature`.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - The corpus is empty
    /// - The column holds values of the wrong kind for this transform
    fn analyze(
        &self,
        feature: &str,
        corpus: &RawColumn,
    ) -> Result<Self::Fitted, PreprocessingError>;

    /// Analyze the corpus and apply the result to the same corpus.
    fn analyze_and_apply(
        &self,
        feature: &str,
        corpus: &RawColumn,
    ) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.analyze(feature, corpus)?;
        fitted.apply(feature, corpus)
    }
}

/// Trait for the apply phase of a transform.
///
/// A fitted transformer is immutable: applying it never changes the
/// statistic, so applying it twice to the same batch yields identical output.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` are cross-platform compatible.
pub trait FittedTransformer<B: Backend>: Clone {
    /// Output produced for a batch.
    type Output;
    /// Serializable representation of the statistic.
    type Params: SerializableParams;

    /// Apply the statistic to a batch of `feature`.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the batch holds values of the wrong kind.
    fn apply(&self, feature: &str, data: &RawColumn) -> Result<Self::Output, PreprocessingError>;

    /// Map transform output back to raw values (if supported).
    fn inverse_transform(&self, data: &Self::Output) -> Result<RawColumn, PreprocessingError>;

    /// Extract the statistic as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let params = self.extract_params();
        let bytes = params
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}
