//! Feature transform orchestration.
//!
//! [`analyze`] computes the corpus statistics once; [`preprocessing_fn`]
//! applies them to any batch. The apply path is pure: it reads the inputs,
//! the configuration and the statistics, and allocates only its output.

use crate::backend::Backend;
use crate::config::FeatureConfig;
use crate::engine::{AnalysisEngine, InMemoryEngine, TransformStatistics};
use crate::features::{transformed_name, FeatureMap, RawColumn, TransformedColumn, TransformedFeatures};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::{cast_label, convert_num_to_one_hot, FittedTransformer};
use tracing::info;

/// Look up every key and check that all columns share one batch length.
fn collect_columns<'a, I>(
    inputs: &'a FeatureMap,
    keys: I,
) -> Result<(Vec<(&'a str, &'a RawColumn)>, usize), PreprocessingError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut columns = Vec::new();
    let mut batch_len = None;

    for key in keys {
        let column = inputs
            .get(key)
            .ok_or_else(|| PreprocessingError::MissingFeature(key.to_string()))?;
        columns.push((key, column));
    }

    for &(key, column) in &columns {
        match batch_len {
            None => batch_len = Some(column.len()),
            Some(expected) if expected != column.len() => {
                return Err(PreprocessingError::BatchMismatch {
                    feature: key.to_string(),
                    expected,
                    got: column.len(),
                });
            }
            Some(_) => {}
        }
    }

    Ok((columns, batch_len.unwrap_or(0)))
}

/// Transform a batch of raw features.
///
/// Emits one entry per configured feature, named by [`transformed_name`]:
/// - categorical `k` with cardinality `dim` → one-hot `[batch, dim + 1]`
///   over the analyzed vocabulary, unseen tokens in the last column;
/// - numerical `k` → values scaled by the corpus min/max;
/// - the label → `i64` per record.
///
/// Keys in `inputs` that the configuration does not name are ignored.
///
/// # Errors
/// - [`PreprocessingError::MissingFeature`] if a configured key is absent,
///   checked for every key before anything is transformed.
/// - [`PreprocessingError::BatchMismatch`] if the columns differ in length.
/// - [`PreprocessingError::MissingStatistic`] /
///   [`PreprocessingError::StatisticMismatch`] if `statistics` does not
///   cover the configuration.
/// - [`PreprocessingError::TypeMismatch`] for values a rule cannot read.
///
/// # Example
/// ```
/// use clinical_transform::backend::CpuBackend;
/// use clinical_transform::config::FeatureConfig;
/// use clinical_transform::features::{FeatureMap, RawColumn};
/// use clinical_transform::transform::{analyze_and_transform, preprocessing_fn};
/// use std::collections::BTreeMap;
///
/// let mut categorical = BTreeMap::new();
/// categorical.insert("trt".to_string(), 4);
/// let config = FeatureConfig::new(categorical, vec!["age".to_string()], "infected").unwrap();
///
/// let mut corpus = FeatureMap::new();
/// corpus.insert("trt".to_string(), RawColumn::from(vec!["1", "0", "1"]));
/// corpus.insert("age".to_string(), RawColumn::from(vec![20.0f64, 40.0, 30.0]));
/// corpus.insert("infected".to_string(), RawColumn::from(vec![1i64, 0, 1]));
///
/// let (statistics, _) = analyze_and_transform::<CpuBackend>(&corpus, &config).unwrap();
///
/// let mut record = FeatureMap::new();
/// record.insert("trt".to_string(), RawColumn::from("1"));
/// record.insert("age".to_string(), RawColumn::from(30.0f64));
/// record.insert("infected".to_string(), RawColumn::from(1i64));
///
/// let out = preprocessing_fn(&record, &config, &statistics).unwrap();
/// let trt = out.get("trt_xf").and_then(|c| c.as_one_hot()).unwrap();
/// assert_eq!(trt.to_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(out.get("infected_xf").and_then(|c| c.as_label()), Some(&[1i64][..]));
/// ```
pub fn preprocessing_fn<B: Backend>(
    inputs: &FeatureMap,
    config: &FeatureConfig,
    statistics: &TransformStatistics<B>,
) -> Result<TransformedFeatures<B>, PreprocessingError> {
    let (columns, _) = collect_columns(inputs, config.feature_keys())?;
    let mut columns = columns.into_iter();
    let mut outputs = TransformedFeatures::new();

    for (key, &dim) in config.categorical() {
        let column = next_column(&mut columns, key)?;
        let vocabulary = statistics
            .vocabulary(key)
            .ok_or_else(|| PreprocessingError::MissingStatistic(key.clone()))?;
        if vocabulary.top_k() != dim + 1 {
            return Err(PreprocessingError::StatisticMismatch {
                feature: key.clone(),
                expected: dim + 1,
                got: vocabulary.top_k(),
            });
        }
        let indices = vocabulary.apply(key, column)?;
        let one_hot = convert_num_to_one_hot(&indices, dim + 1)?;
        outputs.insert(transformed_name(key), TransformedColumn::OneHot(one_hot));
    }

    for key in config.numerical() {
        let column = next_column(&mut columns, key)?;
        let scaler = statistics
            .scaler(key)
            .ok_or_else(|| PreprocessingError::MissingStatistic(key.clone()))?;
        let scaled = scaler.apply(key, column)?;
        outputs.insert(transformed_name(key), TransformedColumn::Scaled(scaled));
    }

    let label_key = config.label_key();
    let column = next_column(&mut columns, label_key)?;
    let labels = cast_label(label_key, column)?;
    outputs.insert(transformed_name(label_key), TransformedColumn::Label(labels));

    Ok(outputs)
}

fn next_column<'a>(
    columns: &mut impl Iterator<Item = (&'a str, &'a RawColumn)>,
    key: &str,
) -> Result<&'a RawColumn, PreprocessingError> {
    columns
        .next()
        .map(|(_, column)| column)
        .ok_or_else(|| PreprocessingError::MissingFeature(key.to_string()))
}

/// Run the analyze phase over a full corpus.
///
/// Computes a vocabulary of `dim + 1` indices for every categorical feature
/// and a min/max range for every numerical feature. The label column is not
/// read.
pub fn analyze<B, E>(
    corpus: &FeatureMap,
    config: &FeatureConfig,
    engine: &E,
) -> Result<TransformStatistics<B>, PreprocessingError>
where
    B: Backend,
    E: AnalysisEngine<B> + ?Sized,
{
    let keys = config
        .categorical()
        .keys()
        .chain(config.numerical().iter())
        .map(String::as_str);
    let (columns, records) = collect_columns(corpus, keys)?;
    let mut columns = columns.into_iter();

    let mut statistics = TransformStatistics::new();
    for (key, &dim) in config.categorical() {
        let column = next_column(&mut columns, key)?;
        statistics.insert_vocabulary(key.clone(), engine.compute_vocabulary(key, column, dim + 1)?);
    }
    for key in config.numerical() {
        let column = next_column(&mut columns, key)?;
        statistics.insert_scaler(key.clone(), engine.compute_min_max(key, column)?);
    }

    info!(
        records,
        categorical = config.categorical().len(),
        numerical = config.numerical().len(),
        "analyzed corpus"
    );
    Ok(statistics)
}

/// Analyze `corpus` with an [`InMemoryEngine`] and transform the same corpus.
pub fn analyze_and_transform<B: Backend>(
    corpus: &FeatureMap,
    config: &FeatureConfig,
) -> Result<(TransformStatistics<B>, TransformedFeatures<B>), PreprocessingError> {
    let statistics = analyze(corpus, config, &InMemoryEngine::new())?;
    let outputs = preprocessing_fn(corpus, config, &statistics)?;
    Ok((statistics, outputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::preprocessing::DegenerateRange;
    use std::collections::BTreeMap;

    fn small_config() -> FeatureConfig {
        let mut categorical = BTreeMap::new();
        categorical.insert("trt".to_string(), 4);
        categorical.insert("gender".to_string(), 2);
        FeatureConfig::new(
            categorical,
            vec!["age".to_string(), "cd40".to_string()],
            "infected",
        )
        .unwrap()
    }

    fn corpus() -> FeatureMap {
        let mut map = FeatureMap::new();
        map.insert("trt".to_string(), RawColumn::from(vec!["1", "0", "1", "2", "3", "1"]));
        map.insert("gender".to_string(), RawColumn::from(vec![0i64, 1, 1, 0, 1, 1]));
        map.insert(
            "age".to_string(),
            RawColumn::from(vec![20.0f64, 45.0, 30.0, 70.0, 33.0, 52.0]),
        );
        map.insert(
            "cd40".to_string(),
            RawColumn::from(vec![100i64, 400, 250, 700, 300, 550]),
        );
        map.insert(
            "infected".to_string(),
            RawColumn::from(vec![1i64, 0, 0, 1, 0, 1]),
        );
        map
    }

    fn record(trt: &str, infected: i64) -> FeatureMap {
        let mut map = FeatureMap::new();
        map.insert("trt".to_string(), RawColumn::from(trt));
        map.insert("gender".to_string(), RawColumn::from(1i64));
        map.insert("age".to_string(), RawColumn::from(45.0f64));
        map.insert("cd40".to_string(), RawColumn::from(400i64));
        map.insert("infected".to_string(), RawColumn::from(infected));
        map
    }

    fn statistics() -> TransformStatistics<CpuBackend> {
        analyze(&corpus(), &small_config(), &InMemoryEngine::new()).unwrap()
    }

    #[test]
    fn test_record_transform() {
        let config = small_config();
        let out = preprocessing_fn(&record("1", 1), &config, &statistics()).unwrap();

        let trt = out.get("trt_xf").and_then(|c| c.as_one_hot()).unwrap();
        assert_eq!(trt.shape(), (1, 5));
        assert_eq!(trt.to_vec(), vec![1.0, 0.0, 0.0, 0.0, 0.0]);

        let age = out.get("age_xf").and_then(|c| c.as_scaled()).unwrap();
        assert_eq!(age.to_vec(), vec![0.5]);

        let cd40 = out.get("cd40_xf").and_then(|c| c.as_scaled()).unwrap();
        assert_eq!(cd40.to_vec(), vec![0.5]);

        assert_eq!(out.get("infected_xf").and_then(|c| c.as_label()), Some(&[1i64][..]));
    }

    #[test]
    fn test_output_keys_match_config() {
        let config = small_config();
        let out = preprocessing_fn(&record("0", 0), &config, &statistics()).unwrap();
        let keys: Vec<String> = out.keys().map(str::to_string).collect();
        let expected: Vec<String> = config.transformed_keys().into_iter().collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_unseen_category_maps_to_oov() {
        let out = preprocessing_fn(&record("9", 0), &small_config(), &statistics()).unwrap();
        let trt = out.get("trt_xf").and_then(|c| c.as_one_hot()).unwrap();
        assert_eq!(trt.to_vec(), vec![0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut inputs = record("1", 1);
        inputs.insert("notes".to_string(), RawColumn::from("free text"));
        let out = preprocessing_fn(&inputs, &small_config(), &statistics()).unwrap();
        assert_eq!(out.len(), 5);
        assert!(!out.contains_key("notes_xf"));
    }

    #[test]
    fn test_missing_feature_fails() {
        let mut inputs = record("1", 1);
        inputs.remove("cd40");
        let result = preprocessing_fn(&inputs, &small_config(), &statistics());
        assert!(matches!(
            result,
            Err(PreprocessingError::MissingFeature(ref k)) if k == "cd40"
        ));
    }

    #[test]
    fn test_missing_label_fails() {
        let mut inputs = record("1", 1);
        inputs.remove("infected");
        let result = preprocessing_fn(&inputs, &small_config(), &statistics());
        assert!(matches!(
            result,
            Err(PreprocessingError::MissingFeature(ref k)) if k == "infected"
        ));
    }

    #[test]
    fn test_batch_mismatch_fails() {
        let mut inputs = record("1", 1);
        inputs.insert("age".to_string(), RawColumn::from(vec![30.0f64, 40.0]));
        let result = preprocessing_fn(&inputs, &small_config(), &statistics());
        assert!(matches!(
            result,
            Err(PreprocessingError::BatchMismatch { expected: 1, got: 2, .. })
        ));
    }

    #[test]
    fn test_missing_statistic_fails() {
        let config = small_config();
        let mut partial = TransformStatistics::<CpuBackend>::new();
        for (key, vocab) in statistics().vocabularies() {
            partial.insert_vocabulary(key, vocab.clone());
        }
        let result = preprocessing_fn(&record("1", 1), &config, &partial);
        assert!(matches!(
            result,
            Err(PreprocessingError::MissingStatistic(ref k)) if k == "age"
        ));
    }

    #[test]
    fn test_statistic_mismatch_fails() {
        let stats = statistics();
        let mut categorical = BTreeMap::new();
        categorical.insert("trt".to_string(), 3);
        categorical.insert("gender".to_string(), 2);
        let config = FeatureConfig::new(
            categorical,
            vec!["age".to_string(), "cd40".to_string()],
            "infected",
        )
        .unwrap();
        let result = preprocessing_fn(&record("1", 1), &config, &stats);
        assert!(matches!(
            result,
            Err(PreprocessingError::StatisticMismatch { expected: 4, got: 5, .. })
        ));
    }

    #[test]
    fn test_batch_transform_corpus() {
        let config = small_config();
        let (_, out) = analyze_and_transform::<CpuBackend>(&corpus(), &config).unwrap();

        let age = out.get("age_xf").and_then(|c| c.as_scaled()).unwrap().to_vec();
        assert_eq!(age[0], 0.0);
        assert_eq!(age[3], 1.0);
        assert!(age.iter().all(|&v| (0.0..=1.0).contains(&v)));

        let trt = out.get("trt_xf").and_then(|c| c.as_one_hot()).unwrap();
        assert_eq!(trt.shape(), (6, 5));
        for row in 0..6 {
            assert_eq!(trt.row(row).iter().sum::<f32>(), 1.0);
        }
    }

    #[test]
    fn test_idempotent() {
        let config = small_config();
        let stats = statistics();
        let inputs = record("2", 0);
        let first = preprocessing_fn(&inputs, &config, &stats).unwrap();
        let second = preprocessing_fn(&inputs, &config, &stats).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_numerical_feature() {
        let config = small_config();
        let mut corpus = corpus();
        corpus.insert("cd40".to_string(), RawColumn::from(vec![300i64; 6]));
        let engine = InMemoryEngine::new().with_degenerate_range(DegenerateRange::Midpoint);
        let stats: TransformStatistics<CpuBackend> = analyze(&corpus, &config, &engine).unwrap();

        let out = preprocessing_fn(&corpus, &config, &stats).unwrap();
        let cd40 = out.get("cd40_xf").and_then(|c| c.as_scaled()).unwrap();
        assert_eq!(cd40.to_vec(), vec![0.5; 6]);
    }

    #[test]
    fn test_analyze_does_not_need_label() {
        let mut corpus = corpus();
        corpus.remove("infected");
        let stats: TransformStatistics<CpuBackend> =
            analyze(&corpus, &small_config(), &InMemoryEngine::new()).unwrap();
        assert_eq!(stats.vocabularies().count(), 2);
        assert_eq!(stats.scalers().count(), 2);
    }

    #[test]
    fn test_analyze_missing_feature() {
        let mut corpus = corpus();
        corpus.remove("gender");
        let result: Result<TransformStatistics<CpuBackend>, _> =
            analyze(&corpus, &small_config(), &InMemoryEngine::new());
        assert!(matches!(result, Err(PreprocessingError::MissingFeature(_))));
    }

    #[test]
    fn test_shared_statistics_across_threads() {
        let config = small_config();
        let stats = statistics();
        let expected = preprocessing_fn(&record("1", 1), &config, &stats).unwrap();
        let (config, stats) = (&config, &stats);
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(move || preprocessing_fn(&record("1", 1), config, stats).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
