//! Feature transforms for the clinical-trial dataset.
//!
//! Transforms that need a corpus-wide statistic follow a two-phase design:
//! an [`Analyzer`] makes one pass over the corpus, and the resulting
//! [`FittedTransformer`] applies the statistic to any number of batches.
//!
//! # Available Transformers
//!
//! ## Encoding
//! - [`VocabularyAnalyzer`]: frequency-ranked vocabulary with an OOV bucket
//! - [`convert_num_to_one_hot`]: index → one-hot row
//! - [`cast_label`]: label → `i64`
//!
//! ## Scaling
//! - [`MinMaxScaler`]: scale to `[0, 1]` by the corpus min/max
//!
//! # Example
//!
//! ```ignore
//! use clinical_transform::preprocessing::{Analyzer, FittedTransformer, VocabularyAnalyzer};
//! use clinical_transform::backend::CpuBackend;
//!
//! let vocab = VocabularyAnalyzer::<CpuBackend>::new(3).analyze("hemo", &corpus)?;
//! vocab.save_to_file("hemo.vocab")?;
//!
//! let loaded = FittedVocabulary::<CpuBackend>::load_from_file("hemo.vocab")?;
//! let indices = loaded.apply("hemo", &batch)?;
//! ```

pub mod encoding;
pub mod error;
pub mod scaling;
pub mod traits;

pub use encoding::{
    cast_label, convert_num_to_one_hot, convert_num_to_one_hot_default, one_hot_to_indices,
    FittedVocabulary, VocabularyAnalyzer, VocabularyParams, DEFAULT_NUM_LABELS,
};
pub use error::PreprocessingError;
pub use scaling::{
    DegenerateRange, FittedMinMaxScaler, MinMaxScaler, MinMaxScalerConfig, MinMaxScalerParams,
};
pub use traits::{Analyzer, FittedTransformer};
