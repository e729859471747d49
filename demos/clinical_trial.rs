// demos/clinical_trial.rs
//
// Analyze a small synthetic clinical-trial corpus, persist the statistics,
// reload them and transform a single patient record.
//
//     RUST_LOG=debug cargo run --example clinical_trial
use clinical_transform::prelude::*;
use tracing_subscriber::EnvFilter;

fn corpus(config: &FeatureConfig, records: usize) -> FeatureMap {
    let mut corpus = FeatureMap::new();
    for (key, &dim) in config.categorical() {
        let values: Vec<String> = (0..records)
            .map(|i| ((i * 3 + key.len()) % dim).to_string())
            .collect();
        corpus.insert(key.clone(), RawColumn::from(values));
    }
    for (n, key) in config.numerical().iter().enumerate() {
        let values: Vec<f64> = (0..records)
            .map(|i| 10.0 * n as f64 + ((i * 37) % 101) as f64)
            .collect();
        corpus.insert(key.clone(), RawColumn::from(values));
    }
    let labels: Vec<i64> = (0..records).map(|i| (i % 4 == 0) as i64).collect();
    corpus.insert(config.label_key().to_string(), RawColumn::from(labels));
    corpus
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = FeatureConfig::clinical_trial();
    let corpus = corpus(&config, 500);

    let statistics: TransformStatistics<CpuBackend> =
        analyze(&corpus, &config, &InMemoryEngine::new())?;

    let path = std::env::temp_dir().join("clinical_trial_statistics.bin");
    statistics.save_to_file(&path)?;
    let statistics = TransformStatistics::<CpuBackend>::load_from_file(&path)?;

    if let Some(trt) = statistics.vocabulary("trt") {
        println!("trt vocabulary: {:?} (OOV index {})", trt.tokens(), trt.oov_index());
    }

    // One patient; "trt" value 7 was never seen and lands in the OOV bucket.
    let mut record = FeatureMap::new();
    for (key, column) in &corpus {
        let value = match column {
            RawColumn::Text(v) => RawColumn::from(v[0].as_str()),
            RawColumn::Int(v) => RawColumn::from(v[0]),
            RawColumn::Float(v) => RawColumn::from(v[0]),
        };
        record.insert(key.clone(), value);
    }
    record.insert("trt".to_string(), RawColumn::from("7"));

    let out = preprocessing_fn(&record, &config, &statistics)?;
    for (key, column) in out.iter() {
        match column {
            TransformedColumn::OneHot(t) => println!("{:>12}: {:?}", key, t.row(0)),
            TransformedColumn::Scaled(t) => println!("{:>12}: {:.4}", key, t.to_vec()[0]),
            TransformedColumn::Label(v) => println!("{:>12}: {}", key, v[0]),
        }
    }

    std::fs::remove_file(path).ok();
    Ok(())
}
