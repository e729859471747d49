//! Analyze phase: corpus-wide statistics.
//!
//! An [`AnalysisEngine`] computes the statistic each two-phase transform
//! needs from a full corpus column. The results are collected into a
//! [`TransformStatistics`] artifact, which the apply phase borrows read-only
//! and which can be persisted between the phases.

use crate::backend::Backend;
use crate::features::RawColumn;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::{
    Analyzer, DegenerateRange, FittedMinMaxScaler, FittedTransformer, FittedVocabulary,
    MinMaxScaler, MinMaxScalerParams, VocabularyAnalyzer, VocabularyParams,
};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Capability that computes corpus-wide statistics.
pub trait AnalysisEngine<B: Backend> {
    /// Frequency-ranked vocabulary of `top_k - 1` tokens plus the OOV bucket.
    fn compute_vocabulary(
        &self,
        feature: &str,
        column: &RawColumn,
        top_k: usize,
    ) -> Result<FittedVocabulary<B>, PreprocessingError>;

    /// Minimum and maximum of the column.
    fn compute_min_max(
        &self,
        feature: &str,
        column: &RawColumn,
    ) -> Result<FittedMinMaxScaler<B>, PreprocessingError>;
}

/// Single-pass engine over an in-memory corpus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InMemoryEngine {
    degenerate_range: DegenerateRange,
    clip: bool,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output policy for numerical features that are constant over the corpus.
    pub fn with_degenerate_range(mut self, policy: DegenerateRange) -> Self {
        self.degenerate_range = policy;
        self
    }

    /// Produce scalers that clamp out-of-range values into `[0, 1]`.
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    pub fn degenerate_range(&self) -> DegenerateRange {
        self.degenerate_range
    }
}

impl<B: Backend> AnalysisEngine<B> for InMemoryEngine {
    fn compute_vocabulary(
        &self,
        feature: &str,
        column: &RawColumn,
        top_k: usize,
    ) -> Result<FittedVocabulary<B>, PreprocessingError> {
        VocabularyAnalyzer::<B>::new(top_k).analyze(feature, column)
    }

    fn compute_min_max(
        &self,
        feature: &str,
        column: &RawColumn,
    ) -> Result<FittedMinMaxScaler<B>, PreprocessingError> {
        MinMaxScaler::<B>::new()
            .with_degenerate_range(self.degenerate_range)
            .with_clip(self.clip)
            .analyze(feature, column)
    }
}

/// Serializable form of [`TransformStatistics`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformStatisticsParams {
    pub vocabularies: BTreeMap<String, VocabularyParams>,
    pub scalers: BTreeMap<String, MinMaxScalerParams>,
}

/// Analyzed statistics for every configured feature.
///
/// Built once by [`crate::transform::analyze`], then shared read-only by any
/// number of apply invocations.
#[derive(Clone, Debug)]
pub struct TransformStatistics<B: Backend> {
    vocabularies: BTreeMap<String, FittedVocabulary<B>>,
    scalers: BTreeMap<String, FittedMinMaxScaler<B>>,
}

impl<B: Backend> Default for TransformStatistics<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> TransformStatistics<B> {
    pub fn new() -> Self {
        Self {
            vocabularies: BTreeMap::new(),
            scalers: BTreeMap::new(),
        }
    }

    pub fn insert_vocabulary(&mut self, key: impl Into<String>, vocabulary: FittedVocabulary<B>) {
        self.vocabularies.insert(key.into(), vocabulary);
    }

    pub fn insert_scaler(&mut self, key: impl Into<String>, scaler: FittedMinMaxScaler<B>) {
        self.scalers.insert(key.into(), scaler);
    }

    /// Vocabulary of a categorical feature.
    pub fn vocabulary(&self, key: &str) -> Option<&FittedVocabulary<B>> {
        self.vocabularies.get(key)
    }

    /// Fitted scaler of a numerical feature.
    pub fn scaler(&self, key: &str) -> Option<&FittedMinMaxScaler<B>> {
        self.scalers.get(key)
    }

    pub fn vocabularies(&self) -> impl Iterator<Item = (&str, &FittedVocabulary<B>)> {
        self.vocabularies.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn scalers(&self) -> impl Iterator<Item = (&str, &FittedMinMaxScaler<B>)> {
        self.scalers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty() && self.scalers.is_empty()
    }

    pub fn extract_params(&self) -> TransformStatisticsParams {
        TransformStatisticsParams {
            vocabularies: self
                .vocabularies
                .iter()
                .map(|(k, v)| (k.clone(), v.extract_params()))
                .collect(),
            scalers: self
                .scalers
                .iter()
                .map(|(k, s)| (k.clone(), s.extract_params()))
                .collect(),
        }
    }

    pub fn from_params(params: TransformStatisticsParams) -> Result<Self, PreprocessingError> {
        let mut statistics = Self::new();
        for (key, vocab) in params.vocabularies {
            statistics.insert_vocabulary(key, FittedVocabulary::from_params(vocab)?);
        }
        for (key, scaler) in params.scalers {
            statistics.insert_scaler(key, FittedMinMaxScaler::from_params(scaler)?);
        }
        Ok(statistics)
    }

    /// Persist the statistics as bincode bytes.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let path = path.as_ref();
        let bytes = self.extract_params().to_bytes()?;
        std::fs::write(path, &bytes)?;
        info!(
            path = %path.display(),
            vocabularies = self.vocabularies.len(),
            scalers = self.scalers.len(),
            bytes = bytes.len(),
            "saved transform statistics"
        );
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let params = TransformStatisticsParams::from_bytes(&bytes)?;
        let statistics = Self::from_params(params)?;
        info!(
            path = %path.display(),
            vocabularies = statistics.vocabularies.len(),
            scalers = statistics.scalers.len(),
            "loaded transform statistics"
        );
        Ok(statistics)
    }
}
