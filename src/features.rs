//! Raw input columns, transformed output columns and the naming convention
//! linking the two.
//!
//! Inputs arrive as a [`FeatureMap`]: feature name → [`RawColumn`], a batch
//! of raw values. A single record is a batch of length one. Outputs are a
//! [`TransformedFeatures`] keyed by [`transformed_name`].

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Suffix appended to every transformed feature key.
pub const TRANSFORMED_SUFFIX: &str = "_xf";

/// Name of the output feature produced from raw feature `key`.
///
/// Keeps raw and transformed namespaces apart in the same mapping.
///
/// ```
/// use clinical_transform::transformed_name;
///
/// assert_eq!(transformed_name("cd420"), "cd420_xf");
/// ```
pub fn transformed_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + TRANSFORMED_SUFFIX.len());
    name.push_str(key);
    name.push_str(TRANSFORMED_SUFFIX);
    name
}

/// A batch of raw values for one feature.
#[derive(Clone, Debug, PartialEq)]
pub enum RawColumn {
    /// String tokens, e.g. categorical codes read as text.
    Text(Vec<String>),
    /// Integer values.
    Int(Vec<i64>),
    /// Floating-point values.
    Float(Vec<f64>),
}

impl RawColumn {
    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        match self {
            RawColumn::Text(v) => v.len(),
            RawColumn::Int(v) => v.len(),
            RawColumn::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value kind, as reported in type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            RawColumn::Text(_) => "text",
            RawColumn::Int(_) => "int",
            RawColumn::Float(_) => "float",
        }
    }

    /// View the column as vocabulary tokens.
    ///
    /// Integers are tokenized by their decimal form. Floats are not valid
    /// vocabulary tokens.
    pub fn tokens(&self, feature: &str) -> Result<Vec<Cow<'_, str>>, PreprocessingError> {
        match self {
            RawColumn::Text(v) => Ok(v.iter().map(|s| Cow::Borrowed(s.as_str())).collect()),
            RawColumn::Int(v) => Ok(v.iter().map(|i| Cow::Owned(i.to_string())).collect()),
            RawColumn::Float(_) => Err(PreprocessingError::type_mismatch(
                feature,
                "vocabulary token (text or int)",
                self.kind(),
            )),
        }
    }

    /// View the column as numbers.
    pub fn numbers(&self, feature: &str) -> Result<Vec<f64>, PreprocessingError> {
        match self {
            RawColumn::Int(v) => Ok(v.iter().map(|&i| i as f64).collect()),
            RawColumn::Float(v) => Ok(v.clone()),
            RawColumn::Text(_) => Err(PreprocessingError::type_mismatch(
                feature,
                "number (int or float)",
                self.kind(),
            )),
        }
    }
}

impl From<Vec<String>> for RawColumn {
    fn from(values: Vec<String>) -> Self {
        RawColumn::Text(values)
    }
}

impl From<Vec<&str>> for RawColumn {
    fn from(values: Vec<&str>) -> Self {
        RawColumn::Text(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for RawColumn {
    fn from(values: Vec<i64>) -> Self {
        RawColumn::Int(values)
    }
}

impl From<Vec<f64>> for RawColumn {
    fn from(values: Vec<f64>) -> Self {
        RawColumn::Float(values)
    }
}

impl From<&str> for RawColumn {
    fn from(value: &str) -> Self {
        RawColumn::Text(vec![value.to_string()])
    }
}

impl From<i64> for RawColumn {
    fn from(value: i64) -> Self {
        RawColumn::Int(vec![value])
    }
}

impl From<f64> for RawColumn {
    fn from(value: f64) -> Self {
        RawColumn::Float(vec![value])
    }
}

/// Raw input mapping: feature name → batch of raw values.
pub type FeatureMap = BTreeMap<String, RawColumn>;

/// One transformed output column.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformedColumn<B: Backend> {
    /// One-hot matrix of shape `[batch, dim + 1]`.
    OneHot(Tensor2D<B>),
    /// Min-max scaled values, one per record.
    Scaled(Tensor1D<B>),
    /// Integer label, one per record.
    Label(Vec<i64>),
}

impl<B: Backend> TransformedColumn<B> {
    /// Number of records in the column.
    pub fn batch_len(&self) -> usize {
        match self {
            TransformedColumn::OneHot(t) => t.shape().0,
            TransformedColumn::Scaled(t) => t.len(),
            TransformedColumn::Label(v) => v.len(),
        }
    }

    pub fn as_one_hot(&self) -> Option<&Tensor2D<B>> {
        match self {
            TransformedColumn::OneHot(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_scaled(&self) -> Option<&Tensor1D<B>> {
        match self {
            TransformedColumn::Scaled(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&[i64]> {
        match self {
            TransformedColumn::Label(v) => Some(v),
            _ => None,
        }
    }
}

/// Transformed output mapping: `transformed_name(key)` → column.
///
/// Ordered by key so that two runs over the same input list their outputs
/// identically.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformedFeatures<B: Backend> {
    columns: BTreeMap<String, TransformedColumn<B>>,
}

impl<B: Backend> TransformedFeatures<B> {
    pub(crate) fn new() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: String, column: TransformedColumn<B>) {
        self.columns.insert(key, column);
    }

    /// Look up an output column by its transformed name.
    pub fn get(&self, key: &str) -> Option<&TransformedColumn<B>> {
        self.columns.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    /// Output keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TransformedColumn<B>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, TransformedColumn<B>> {
        self.columns
    }
}

impl<B: Backend> IntoIterator for TransformedFeatures<B> {
    type Item = (String, TransformedColumn<B>);
    type IntoIter = btree_map::IntoIter<String, TransformedColumn<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_transformed_name_appends_suffix() {
        assert_eq!(transformed_name("trt"), "trt_xf");
        assert_eq!(transformed_name(""), "_xf");
    }

    #[test]
    fn test_transformed_name_is_injective() {
        let keys = ["time", "trt", "treat", "age", "z30", "infected"];
        let names: std::collections::HashSet<String> =
            keys.iter().map(|k| transformed_name(k)).collect();
        assert_eq!(names.len(), keys.len());
    }

    #[test]
    fn test_int_tokens_use_decimal_form() {
        let col = RawColumn::from(vec![0i64, 3, -1]);
        let tokens = col.tokens("trt").unwrap();
        assert_eq!(tokens, vec!["0", "3", "-1"]);
    }

    #[test]
    fn test_float_is_not_a_token() {
        let col = RawColumn::from(vec![1.5f64]);
        assert!(matches!(
            col.tokens("trt"),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_text_is_not_a_number() {
        let col = RawColumn::from(vec!["35"]);
        assert!(matches!(
            col.numbers("age"),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_scalar_constructors_are_single_record_batches() {
        assert_eq!(RawColumn::from("1").len(), 1);
        assert_eq!(RawColumn::from(35i64).len(), 1);
        assert_eq!(RawColumn::from(70.5f64).len(), 1);
    }

    #[test]
    fn test_transformed_column_batch_len() {
        let one_hot = TransformedColumn::<CpuBackend>::OneHot(Tensor2D::zeros(3, 5));
        let scaled = TransformedColumn::<CpuBackend>::Scaled(Tensor1D::zeros(3));
        let label = TransformedColumn::<CpuBackend>::Label(vec![0, 1, 1]);
        assert_eq!(one_hot.batch_len(), 3);
        assert_eq!(scaled.batch_len(), 3);
        assert_eq!(label.batch_len(), 3);
        assert!(label.as_one_hot().is_none());
        assert_eq!(label.as_label(), Some(&[0i64, 1, 1][..]));
    }

    #[test]
    fn test_transformed_features_keys_are_sorted() {
        let mut out = TransformedFeatures::<CpuBackend>::new();
        out.insert("z30_xf".to_string(), TransformedColumn::Label(vec![0]));
        out.insert("age_xf".to_string(), TransformedColumn::Label(vec![0]));
        let keys: Vec<&str> = out.keys().collect();
        assert_eq!(keys, vec!["age_xf", "z30_xf"]);
    }
}
