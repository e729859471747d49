//! Corpus-wide Min-Max Scaler.
//!
//! Rescales a numerical feature to `[0, 1]` using the minimum and maximum
//! observed over the whole analysis corpus, not over the batch being
//! transformed:
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min)
//! ```
//!
//! # Example
//! ```ignore
//! use clinical_transform::preprocessing::{Analyzer, FittedTransformer, MinMaxScaler};
//! use clinical_transform::backend::CpuBackend;
//!
//! let scaler = MinMaxScaler::<CpuBackend>::new().with_clip(true);
//!
//! let fitted = scaler.analyze("age", &corpus)?;
//! let scaled = fitted.apply("age", &batch)?;
//! ```

use crate::backend::{Backend, Tensor1D};
use crate::features::RawColumn;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{Analyzer, FittedTransformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Output policy for a feature that is constant over the corpus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegenerateRange {
    /// Every record scales to 0.
    #[default]
    Zeros,
    /// Every record scales to 0.5.
    Midpoint,
}

impl DegenerateRange {
    fn value(self) -> f32 {
        match self {
            DegenerateRange::Zeros => 0.0,
            DegenerateRange::Midpoint => 0.5,
        }
    }
}

/// Configuration for MinMaxScaler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerConfig {
    /// Output for a constant feature.
    pub degenerate_range: DegenerateRange,
    /// Clamp values outside the corpus range into `[0, 1]`.
    pub clip: bool,
}

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Configuration options.
    pub config: MinMaxScalerConfig,
    /// Corpus minimum.
    pub min_: f64,
    /// Corpus maximum.
    pub max_: f64,
    /// Number of corpus records the range was computed from.
    pub n_samples: usize,
}

/// MinMaxScaler analyzer (unfitted).
#[derive(Clone, Debug)]
pub struct MinMaxScaler<B: Backend> {
    config: MinMaxScalerConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for MinMaxScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MinMaxScaler<B> {
    /// Create a new MinMaxScaler: constant features scale to 0, no clipping.
    pub fn new() -> Self {
        Self {
            config: MinMaxScalerConfig::default(),
            _backend: PhantomData,
        }
    }

    /// Set the output policy for constant features.
    pub fn with_degenerate_range(mut self, policy: DegenerateRange) -> Self {
        self.config.degenerate_range = policy;
        self
    }

    /// Clamp values outside the corpus range into `[0, 1]`.
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.config.clip = clip;
        self
    }

    pub fn config(&self) -> &MinMaxScalerConfig {
        &self.config
    }
}

fn finite_numbers(feature: &str, column: &RawColumn) -> Result<Vec<f64>, PreprocessingError> {
    let values = column.numbers(feature)?;
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(PreprocessingError::type_mismatch(
            feature,
            "finite number",
            bad.to_string(),
        ));
    }
    Ok(values)
}

impl<B: Backend> Analyzer<B> for MinMaxScaler<B> {
    type Output = Tensor1D<B>;
    type Params = MinMaxScalerParams;
    type Fitted = FittedMinMaxScaler<B>;

    fn analyze(
        &self,
        feature: &str,
        corpus: &RawColumn,
    ) -> Result<Self::Fitted, PreprocessingError> {
        let values = finite_numbers(feature, corpus)?;
        if values.is_empty() {
            return Err(PreprocessingError::EmptyData(format!(
                "Cannot fit MinMaxScaler for {} on empty data",
                feature
            )));
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if min == max {
            warn!(
                feature,
                value = min,
                policy = ?self.config.degenerate_range,
                "feature is constant over the corpus"
            );
        } else {
            debug!(feature, min, max, n_samples = values.len(), "computed min/max");
        }

        Ok(FittedMinMaxScaler {
            config: self.config,
            min_: min,
            max_: max,
            n_samples: values.len(),
            _backend: PhantomData,
        })
    }
}

/// Fitted MinMaxScaler ready for the apply phase.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler<B: Backend> {
    config: MinMaxScalerConfig,
    min_: f64,
    max_: f64,
    n_samples: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedMinMaxScaler<B> {
    /// Corpus minimum.
    pub fn min(&self) -> f64 {
        self.min_
    }

    /// Corpus maximum.
    pub fn max(&self) -> f64 {
        self.max_
    }

    /// `max - min`.
    pub fn data_range(&self) -> f64 {
        self.max_ - self.min_
    }

    /// Position of `x` within the corpus range, `min` → 0 and `max` → 1.
    ///
    /// A finite corpus can span more than `f64::MAX`; the operands are then
    /// halved so the subtraction stays finite.
    fn scale(&self, x: f64) -> f64 {
        let range = self.data_range();
        if range.is_finite() {
            (x - self.min_) / range
        } else {
            (x / 2.0 - self.min_ / 2.0) / (self.max_ / 2.0 - self.min_ / 2.0)
        }
    }

    fn unscale(&self, v: f64) -> f64 {
        let range = self.data_range();
        if range.is_finite() {
            v * range + self.min_
        } else {
            (v * (self.max_ / 2.0 - self.min_ / 2.0) + self.min_ / 2.0) * 2.0
        }
    }

    /// Whether the feature was constant over the corpus.
    pub fn is_degenerate(&self) -> bool {
        self.min_ == self.max_
    }

    /// Number of corpus records the range was computed from.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn config(&self) -> &MinMaxScalerConfig {
        &self.config
    }
}

impl<B: Backend> FittedTransformer<B> for FittedMinMaxScaler<B> {
    type Output = Tensor1D<B>;
    type Params = MinMaxScalerParams;

    fn apply(&self, feature: &str, data: &RawColumn) -> Result<Self::Output, PreprocessingError> {
        let values = finite_numbers(feature, data)?;

        let scaled: Vec<f32> = if self.is_degenerate() {
            vec![self.config.degenerate_range.value(); values.len()]
        } else {
            values.iter().map(|&x| self.scale(x) as f32).collect()
        };

        let result = Tensor1D::new(scaled);
        if self.config.clip {
            Ok(result.clamp(0.0, 1.0))
        } else {
            Ok(result)
        }
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<RawColumn, PreprocessingError> {
        // A constant feature only ever held its one corpus value.
        let values = data
            .to_vec()
            .into_iter()
            .map(|x| {
                if self.is_degenerate() {
                    self.min_
                } else {
                    self.unscale(x as f64)
                }
            })
            .collect();
        Ok(RawColumn::Float(values))
    }

    fn extract_params(&self) -> Self::Params {
        MinMaxScalerParams {
            config: self.config,
            min_: self.min_,
            max_: self.max_,
            n_samples: self.n_samples,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if !params.min_.is_finite() || !params.max_.is_finite() || params.min_ > params.max_ {
            return Err(PreprocessingError::InvalidParameter(format!(
                "Invalid range [{}, {}]",
                params.min_, params.max_
            )));
        }
        Ok(Self {
            config: params.config,
            min_: params.min_,
            max_: params.max_,
            n_samples: params.n_samples,
            _backend: PhantomData,
        })
    }
}
