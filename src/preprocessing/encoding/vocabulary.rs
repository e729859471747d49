//! Frequency-ranked vocabulary for categorical features.
//!
//! The analyze phase counts token frequencies over the full corpus and keeps
//! the `top_k - 1` most frequent tokens. Index `top_k - 1` is reserved as the
//! out-of-vocabulary (OOV) bucket, so the apply phase maps every record to an
//! index in `[0, top_k)` and never fails on unseen values.
//!
//! Ties in frequency are broken by token, in descending lexicographic order,
//! so the same corpus always yields the same vocabulary.

use crate::backend::Backend;
use crate::features::RawColumn;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{Analyzer, FittedTransformer};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use tracing::debug;

/// Vocabulary analyzer (unfitted).
///
/// # Example
/// ```ignore
/// use clinical_transform::preprocessing::{Analyzer, FittedTransformer, VocabularyAnalyzer};
/// use clinical_transform::backend::CpuBackend;
///
/// // trt has cardinality 4: four ranked tokens plus the OOV bucket.
/// let analyzer = VocabularyAnalyzer::<CpuBackend>::new(5);
/// let vocab = analyzer.analyze("trt", &corpus)?;
/// let indices = vocab.apply("trt", &batch)?;
/// ```
#[derive(Clone, Debug)]
pub struct VocabularyAnalyzer<B: Backend> {
    top_k: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> VocabularyAnalyzer<B> {
    /// Create an analyzer producing `top_k` indices, the last one being OOV.
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            _backend: PhantomData,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

/// Serializable parameters for a fitted vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyParams {
    /// Number of output indices, OOV bucket included.
    pub top_k: usize,
    /// Ranked tokens; a token's position is its index.
    pub tokens: Vec<String>,
}

/// Fitted vocabulary ready for the apply phase.
#[derive(Clone, Debug)]
pub struct FittedVocabulary<B: Backend> {
    tokens: Vec<String>,
    index: HashMap<String, i64>,
    top_k: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedVocabulary<B> {
    fn from_ranked(tokens: Vec<String>, top_k: usize) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as i64))
            .collect();
        Self {
            tokens,
            index,
            top_k,
            _backend: PhantomData,
        }
    }

    /// Ranked tokens, most frequent first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of output indices, OOV bucket included.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Index every unseen token maps to.
    pub fn oov_index(&self) -> i64 {
        (self.top_k - 1) as i64
    }

    /// Index for a single token.
    pub fn lookup(&self, token: &str) -> i64 {
        self.index.get(token).copied().unwrap_or(self.oov_index())
    }

    /// Token at `index`, or `None` for the OOV bucket and out-of-range indices.
    pub fn token_for(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tokens.get(i))
            .map(String::as_str)
    }
}

impl<B: Backend> Analyzer<B> for VocabularyAnalyzer<B> {
    type Output = Vec<i64>;
    type Params = VocabularyParams;
    type Fitted = FittedVocabulary<B>;

    fn analyze(
        &self,
        feature: &str,
        corpus: &RawColumn,
    ) -> Result<Self::Fitted, PreprocessingError> {
        if self.top_k == 0 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "top_k for {} must be at least 1",
                feature
            )));
        }

        let tokens = corpus.tokens(feature)?;
        if tokens.is_empty() {
            return Err(PreprocessingError::EmptyData(format!(
                "Cannot compute vocabulary for {} on empty data",
                feature
            )));
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *counts.entry(token.as_ref()).or_insert(0) += 1;
        }
        let distinct = counts.len();

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by_key(|&(token, count)| (Reverse(count), Reverse(token)));
        let kept: Vec<String> = ranked
            .into_iter()
            .take(self.top_k - 1)
            .map(|(token, _)| token.to_string())
            .collect();

        debug!(
            feature,
            top_k = self.top_k,
            distinct,
            kept = kept.len(),
            "computed vocabulary"
        );

        Ok(FittedVocabulary::from_ranked(kept, self.top_k))
    }
}

impl<B: Backend> FittedTransformer<B> for FittedVocabulary<B> {
    type Output = Vec<i64>;
    type Params = VocabularyParams;

    fn apply(&self, feature: &str, data: &RawColumn) -> Result<Self::Output, PreprocessingError> {
        let tokens = data.tokens(feature)?;
        Ok(tokens.iter().map(|t| self.lookup(t)).collect())
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<RawColumn, PreprocessingError> {
        let mut result = Vec::with_capacity(data.len());
        for &idx in data {
            match self.token_for(idx) {
                Some(token) => result.push(token.to_string()),
                None if idx == self.oov_index() => {
                    return Err(PreprocessingError::InvalidParameter(
                        "OOV index has no token to invert to".to_string(),
                    ));
                }
                None => {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "Index {} out of bounds (top_k {})",
                        idx, self.top_k
                    )));
                }
            }
        }
        Ok(RawColumn::Text(result))
    }

    fn extract_params(&self) -> Self::Params {
        VocabularyParams {
            top_k: self.top_k,
            tokens: self.tokens.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.top_k == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "top_k must be at least 1".to_string(),
            ));
        }
        if params.tokens.len() > params.top_k - 1 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "{} tokens do not fit in top_k {}",
                params.tokens.len(),
                params.top_k
            )));
        }
        let distinct: HashSet<&String> = params.tokens.iter().collect();
        if distinct.len() != params.tokens.len() {
            return Err(PreprocessingError::InvalidParameter(
                "Vocabulary tokens must be unique".to_string(),
            ));
        }
        Ok(FittedVocabulary::from_ranked(params.tokens, params.top_k))
    }
}
