//! # clinical-transform
//!
//! Feature transforms for a tabular clinical-trial classification dataset.
//!
//! Raw features are mapped to a model-ready representation:
//! - categorical features → one-hot vectors over a corpus vocabulary,
//! - numerical features → scaled to `[0, 1]` by the corpus min/max,
//! - the label → integer.
//!
//! The work is split into two phases. [`transform::analyze`] makes one pass
//! over the full corpus and produces [`engine::TransformStatistics`];
//! [`transform::preprocessing_fn`] applies those statistics to any batch,
//! without I/O or mutation.
//!
//! ```
//! use clinical_transform::prelude::*;
//! use std::collections::BTreeMap;
//!
//! let mut categorical = BTreeMap::new();
//! categorical.insert("hemo".to_string(), 2);
//! let config = FeatureConfig::new(categorical, vec!["cd40".to_string()], "infected").unwrap();
//!
//! let mut corpus = FeatureMap::new();
//! corpus.insert("hemo".to_string(), RawColumn::from(vec![0i64, 0, 1]));
//! corpus.insert("cd40".to_string(), RawColumn::from(vec![100.0f64, 300.0, 500.0]));
//! corpus.insert("infected".to_string(), RawColumn::from(vec![0i64, 1, 0]));
//!
//! let statistics = analyze::<CpuBackend, _>(&corpus, &config, &InMemoryEngine::new()).unwrap();
//! let out = preprocessing_fn(&corpus, &config, &statistics).unwrap();
//!
//! assert_eq!(out.get("cd40_xf").and_then(|c| c.as_scaled()).unwrap().to_vec(), vec![0.0, 0.5, 1.0]);
//! ```

pub mod backend;
pub mod config;
pub mod engine;
pub mod features;
pub mod preprocessing;
pub mod serialization;
pub mod transform;

#[cfg(feature = "cpu")]
pub use backend::CpuBackend;
pub use backend::{Backend, Tensor1D, Tensor2D};
pub use config::FeatureConfig;
pub use engine::{AnalysisEngine, InMemoryEngine, TransformStatistics};
pub use features::{
    transformed_name, FeatureMap, RawColumn, TransformedColumn, TransformedFeatures,
    TRANSFORMED_SUFFIX,
};
pub use preprocessing::PreprocessingError;
pub use transform::{analyze, analyze_and_transform, preprocessing_fn};

/// Commonly used items.
pub mod prelude {
    #[cfg(feature = "cpu")]
    pub use crate::backend::CpuBackend;
    pub use crate::backend::{Backend, Tensor1D, Tensor2D};
    pub use crate::config::FeatureConfig;
    pub use crate::engine::{AnalysisEngine, InMemoryEngine, TransformStatistics};
    pub use crate::features::{
        transformed_name, FeatureMap, RawColumn, TransformedColumn, TransformedFeatures,
    };
    pub use crate::preprocessing::{
        Analyzer, DegenerateRange, FittedTransformer, MinMaxScaler, PreprocessingError,
        VocabularyAnalyzer,
    };
    pub use crate::transform::{analyze, analyze_and_transform, preprocessing_fn};
}
