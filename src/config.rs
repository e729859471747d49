//! Feature tables for the transform.
//!
//! A [`FeatureConfig`] names which input keys are categorical (with their
//! cardinality), which are numerical, and which one is the label. It is
//! validated once at construction and then passed by reference to every
//! analyze and apply call.

use crate::features::transformed_name;
use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::info;

/// Immutable feature tables.
///
/// # Invariants
/// - Categorical and numerical keys are disjoint.
/// - The label key appears in neither table.
/// - At least one categorical or numerical feature is configured.
/// - Every cardinality is at least 1.
///
/// # Example
/// ```
/// use clinical_transform::config::FeatureConfig;
///
/// let config = FeatureConfig::clinical_trial();
/// assert_eq!(config.cardinality("trt"), Some(4));
/// assert!(config.transformed_keys().contains("infected_xf"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeatureTables")]
pub struct FeatureConfig {
    categorical: BTreeMap<String, usize>,
    numerical: Vec<String>,
    label_key: String,
}

#[derive(Deserialize)]
struct FeatureTables {
    categorical: BTreeMap<String, usize>,
    numerical: Vec<String>,
    label_key: String,
}

impl TryFrom<FeatureTables> for FeatureConfig {
    type Error = PreprocessingError;

    fn try_from(tables: FeatureTables) -> Result<Self, Self::Error> {
        FeatureConfig::new(tables.categorical, tables.numerical, tables.label_key)
    }
}

impl FeatureConfig {
    /// Build and validate a configuration.
    pub fn new(
        categorical: BTreeMap<String, usize>,
        numerical: Vec<String>,
        label_key: impl Into<String>,
    ) -> Result<Self, PreprocessingError> {
        let config = Self {
            categorical,
            numerical,
            label_key: label_key.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Tables of the clinical-trial infection dataset.
    pub fn clinical_trial() -> Self {
        let mut categorical = BTreeMap::new();
        categorical.insert("trt".to_string(), 4);
        for key in [
            "hemo", "homo", "drugs", "oprior", "z30", "race", "gender", "str2", "symptom",
            "treat", "offtrt",
        ] {
            categorical.insert(key.to_string(), 2);
        }

        let numerical = [
            "time", "age", "wtkg", "karnof", "preanti", "strat", "cd40", "cd420", "cd80", "cd820",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();

        Self {
            categorical,
            numerical,
            label_key: "infected".to_string(),
        }
    }

    /// Check the table invariants.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if self.label_key.is_empty() {
            return Err(PreprocessingError::InvalidConfig(
                "label key must not be empty".to_string(),
            ));
        }
        if self.categorical.is_empty() && self.numerical.is_empty() {
            return Err(PreprocessingError::InvalidConfig(
                "no categorical or numerical features configured".to_string(),
            ));
        }

        for (key, &dim) in &self.categorical {
            if key.is_empty() {
                return Err(PreprocessingError::InvalidConfig(
                    "categorical key must not be empty".to_string(),
                ));
            }
            if dim == 0 {
                return Err(PreprocessingError::InvalidConfig(format!(
                    "cardinality of {} must be at least 1",
                    key
                )));
            }
        }

        let mut seen = HashSet::new();
        for key in &self.numerical {
            if key.is_empty() {
                return Err(PreprocessingError::InvalidConfig(
                    "numerical key must not be empty".to_string(),
                ));
            }
            if !seen.insert(key.as_str()) {
                return Err(PreprocessingError::InvalidConfig(format!(
                    "numerical feature {} listed twice",
                    key
                )));
            }
            if self.categorical.contains_key(key) {
                return Err(PreprocessingError::InvalidConfig(format!(
                    "{} is both categorical and numerical",
                    key
                )));
            }
        }

        if self.categorical.contains_key(&self.label_key) || seen.contains(self.label_key.as_str())
        {
            return Err(PreprocessingError::InvalidConfig(format!(
                "label key {} must not be a feature",
                self.label_key
            )));
        }

        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// The expected shape is
    /// `{"categorical": {"trt": 4}, "numerical": ["age"], "label_key": "infected"}`.
    pub fn from_json_str(json: &str) -> Result<Self, PreprocessingError> {
        let tables: FeatureTables = serde_json::from_str(json)?;
        Self::try_from(tables)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            categorical = config.categorical.len(),
            numerical = config.numerical.len(),
            "loaded feature config"
        );
        Ok(config)
    }

    /// Categorical feature → cardinality.
    pub fn categorical(&self) -> &BTreeMap<String, usize> {
        &self.categorical
    }

    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    pub fn label_key(&self) -> &str {
        &self.label_key
    }

    /// Cardinality of a categorical feature.
    pub fn cardinality(&self, key: &str) -> Option<usize> {
        self.categorical.get(key).copied()
    }

    /// Every input key the transform reads: categorical in key order,
    /// numerical in list order, then the label.
    pub fn feature_keys(&self) -> impl Iterator<Item = &str> {
        self.categorical
            .keys()
            .map(String::as_str)
            .chain(self.numerical.iter().map(String::as_str))
            .chain(std::iter::once(self.label_key.as_str()))
    }

    /// The exact key set of the transform output.
    pub fn transformed_keys(&self) -> BTreeSet<String> {
        self.feature_keys().map(transformed_name).collect()
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::clinical_trial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(categorical: &[(&str, usize)]) -> BTreeMap<String, usize> {
        categorical
            .iter()
            .map(|&(k, d)| (k.to_string(), d))
            .collect()
    }

    #[test]
    fn test_clinical_trial_tables() {
        let config = FeatureConfig::clinical_trial();
        assert!(config.validate().is_ok());
        assert_eq!(config.categorical().len(), 12);
        assert_eq!(config.numerical().len(), 10);
        assert_eq!(config.cardinality("trt"), Some(4));
        assert_eq!(config.cardinality("gender"), Some(2));
        assert_eq!(config.cardinality("age"), None);
        assert_eq!(config.label_key(), "infected");
    }

    #[test]
    fn test_transformed_keys() {
        let config = FeatureConfig::clinical_trial();
        let keys = config.transformed_keys();
        assert_eq!(keys.len(), 23);
        assert!(keys.contains("trt_xf"));
        assert!(keys.contains("cd820_xf"));
        assert!(keys.contains("infected_xf"));
        assert!(!keys.contains("trt"));
    }

    #[test]
    fn test_feature_keys_order() {
        let config = FeatureConfig::new(
            tables(&[("b", 2), ("a", 3)]),
            vec!["z".to_string(), "y".to_string()],
            "label",
        )
        .unwrap();
        let keys: Vec<&str> = config.feature_keys().collect();
        assert_eq!(keys, vec!["a", "b", "z", "y", "label"]);
    }

    #[test]
    fn test_overlapping_tables_rejected() {
        let result = FeatureConfig::new(tables(&[("age", 2)]), vec!["age".to_string()], "y");
        assert!(matches!(result, Err(PreprocessingError::InvalidConfig(_))));
    }

    #[test]
    fn test_label_in_table_rejected() {
        let result = FeatureConfig::new(tables(&[("infected", 2)]), vec![], "infected");
        assert!(matches!(result, Err(PreprocessingError::InvalidConfig(_))));

        let result =
            FeatureConfig::new(BTreeMap::new(), vec!["infected".to_string()], "infected");
        assert!(matches!(result, Err(PreprocessingError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_cardinality_rejected() {
        let result = FeatureConfig::new(tables(&[("trt", 0)]), vec![], "y");
        assert!(matches!(result, Err(PreprocessingError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_tables_rejected() {
        let result = FeatureConfig::new(BTreeMap::new(), vec![], "y");
        assert!(matches!(result, Err(PreprocessingError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_numerical_rejected() {
        let result =
            FeatureConfig::new(BTreeMap::new(), vec!["age".to_string(), "age".to_string()], "y");
        assert!(matches!(result, Err(PreprocessingError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{"categorical": {"trt": 4, "hemo": 2}, "numerical": ["age"], "label_key": "infected"}"#;
        let config = FeatureConfig::from_json_str(json).unwrap();
        assert_eq!(config.cardinality("trt"), Some(4));
        assert_eq!(config.numerical(), &["age".to_string()]);
    }

    #[test]
    fn test_from_json_str_validates() {
        let json = r#"{"categorical": {"age": 2}, "numerical": ["age"], "label_key": "infected"}"#;
        assert!(matches!(
            FeatureConfig::from_json_str(json),
            Err(PreprocessingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_json_str_malformed() {
        assert!(matches!(
            FeatureConfig::from_json_str("{"),
            Err(PreprocessingError::SerializationError(_))
        ));
    }

    #[test]
    fn test_json_round_trip_through_serde() {
        let config = FeatureConfig::clinical_trial();
        let json = serde_json::to_string(&config).unwrap();
        let restored: FeatureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join("test_feature_config.json");
        std::fs::write(
            &path,
            r#"{"categorical": {"trt": 4}, "numerical": [], "label_key": "infected"}"#,
        )
        .unwrap();
        let config = FeatureConfig::from_json_file(&path).unwrap();
        assert_eq!(config.transformed_keys().len(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = FeatureConfig::from_json_file("/nonexistent/feature_config.json");
        assert!(matches!(result, Err(PreprocessingError::IoError(_))));
    }
}
