//! Label passthrough.
//!
//! The label is cast to `i64` without vocabulary lookup or rescaling.

use crate::features::RawColumn;
use crate::preprocessing::error::PreprocessingError;

/// Cast a label column to integers.
///
/// - `Int` values pass through unchanged.
/// - `Float` values are rounded to the nearest integer, ties to even.
/// - `Text` values must parse as an integer or a float.
///
/// # Errors
/// [`PreprocessingError::TypeMismatch`] for values that are not finite
/// numbers or do not fit in `i64`.
///
/// # Example
/// ```
/// use clinical_transform::features::RawColumn;
/// use clinical_transform::preprocessing::cast_label;
///
/// let labels = cast_label("infected", &RawColumn::from(vec![0.0f64, 1.0, 0.9])).unwrap();
/// assert_eq!(labels, vec![0, 1, 1]);
/// ```
pub fn cast_label(feature: &str, column: &RawColumn) -> Result<Vec<i64>, PreprocessingError> {
    match column {
        RawColumn::Int(values) => Ok(values.clone()),
        RawColumn::Float(values) => values.iter().map(|&v| round_to_i64(feature, v)).collect(),
        RawColumn::Text(values) => values
            .iter()
            .map(|s| {
                let trimmed = s.trim();
                if let Ok(v) = trimmed.parse::<i64>() {
                    return Ok(v);
                }
                match trimmed.parse::<f64>() {
                    Ok(v) => round_to_i64(feature, v),
                    Err(_) => Err(PreprocessingError::type_mismatch(
                        feature,
                        "integer label",
                        format!("text {:?}", s),
                    )),
                }
            })
            .collect(),
    }
}

fn round_to_i64(feature: &str, value: f64) -> Result<i64, PreprocessingError> {
    let rounded = value.round_ties_even();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(PreprocessingError::type_mismatch(
            feature,
            "integer label",
            format!("float {}", value),
        ));
    }
    Ok(rounded as i64)
}
