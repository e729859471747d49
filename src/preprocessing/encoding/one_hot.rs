//! One-hot expansion of integer indices.
//!
//! Turns the vocabulary index of each record into a row of a
//! `[batch, num_labels]` matrix with a single 1.

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;

/// Label count used when encoding a binary outcome.
pub const DEFAULT_NUM_LABELS: usize = 2;

/// Expand integer indices into one-hot rows.
///
/// Row `r` of the result has a 1 at column `indices[r]` and 0 elsewhere, so
/// the output always has shape `[indices.len(), num_labels]`.
///
/// # Errors
/// - [`PreprocessingError::InvalidParameter`] if `num_labels` is 0 or an
///   index falls outside `[0, num_labels)`.
///
/// # Example
/// ```
/// use clinical_transform::backend::CpuBackend;
/// use clinical_transform::preprocessing::convert_num_to_one_hot;
///
/// let one_hot = convert_num_to_one_hot::<CpuBackend>(&[0, 2], 3).unwrap();
/// assert_eq!(one_hot.shape(), (2, 3));
/// assert_eq!(one_hot.to_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
/// ```
pub fn convert_num_to_one_hot<B: Backend>(
    indices: &[i64],
    num_labels: usize,
) -> Result<Tensor2D<B>, PreprocessingError> {
    if num_labels == 0 {
        return Err(PreprocessingError::InvalidParameter(
            "num_labels must be at least 1".to_string(),
        ));
    }

    let rows = indices.len();
    let mut result = vec![0.0f32; rows * num_labels];

    for (row, &idx) in indices.iter().enumerate() {
        let col = usize::try_from(idx)
            .ok()
            .filter(|&c| c < num_labels)
            .ok_or_else(|| {
                PreprocessingError::InvalidParameter(format!(
                    "Index {} at row {} out of range for {} labels",
                    idx, row, num_labels
                ))
            })?;
        result[row * num_labels + col] = 1.0;
    }

    Ok(Tensor2D::new(result, rows, num_labels))
}

/// [`convert_num_to_one_hot`] with [`DEFAULT_NUM_LABELS`] labels.
pub fn convert_num_to_one_hot_default<B: Backend>(
    indices: &[i64],
) -> Result<Tensor2D<B>, PreprocessingError> {
    convert_num_to_one_hot(indices, DEFAULT_NUM_LABELS)
}

/// Recover the index of each one-hot row.
///
/// # Errors
/// Returns [`PreprocessingError::InvalidParameter`] if a row has no active
/// entry.
pub fn one_hot_to_indices<B: Backend>(
    one_hot: &Tensor2D<B>,
) -> Result<Vec<i64>, PreprocessingError> {
    let (_, cols) = one_hot.shape();
    let data = one_hot.to_vec();

    one_hot
        .argmax_rows()
        .into_iter()
        .enumerate()
        .map(|(row, best)| match best {
            Some(col) if data[row * cols + col] > 0.5 => Ok(col as i64),
            _ => Err(PreprocessingError::InvalidParameter(format!(
                "Row {} has no active category",
                row
            ))),
        })
        .collect()
}
