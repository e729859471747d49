//! Scaling transformers for numerical features.
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`MinMaxScaler`] | Scale to `[0, 1]` by the corpus-wide min and max |

pub mod minmax;

pub use minmax::{
    DegenerateRange, FittedMinMaxScaler, MinMaxScaler, MinMaxScalerConfig, MinMaxScalerParams,
};
