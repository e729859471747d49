//! Categorical and label encoding.
//!
//! # Available Encoders
//!
//! ## VocabularyAnalyzer
//! Learns a frequency-ranked vocabulary and maps tokens to indices, with a
//! reserved out-of-vocabulary bucket at index `top_k - 1`.
//!
//! ```ignore
//! // Corpus: ["1", "0", "1"], top_k = 3
//! // Vocabulary: {"1": 0, "0": 1}, OOV = 2
//! // ["0", "1", "7"] -> [1, 0, 2]
//! ```
//!
//! ## convert_num_to_one_hot
//! Expands the indices into one-hot rows.
//!
//! ```ignore
//! // [1, 0, 2], num_labels = 3 -> [[0,1,0], [1,0,0], [0,0,1]]
//! ```
//!
//! ## cast_label
//! Casts the label column to integers.

mod label;
mod one_hot;
mod vocabulary;

pub use label::cast_label;
pub use one_hot::{
    convert_num_to_one_hot, convert_num_to_one_hot_default, one_hot_to_indices,
    DEFAULT_NUM_LABELS,
};
pub use vocabulary::{FittedVocabulary, VocabularyAnalyzer, VocabularyParams};
