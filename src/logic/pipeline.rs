//! Prediction Pipeline
//!
//! training:  load -> split -> imputer fit -> forest fit -> store save
//! inference: operator input -> defaults -> imputer -> forest -> risk tier

use std::path::PathBuf;

use crate::logic::artifacts::ArtifactManifest;
use crate::logic::config::PipelineConfig;
use crate::logic::dataset::{self, Label};
use crate::logic::error::PipelineResult;
use crate::logic::features::OperatorInput;
use crate::logic::model::{Classifier, MeanImputer, RandomForest};
use crate::logic::risk::{self, RiskAssessment};

/// What a training run produced, kept in memory for the assessment loop
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub imputer: MeanImputer,
    pub forest: RandomForest,
    pub summary: TrainingSummary,
}

#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub test_data_dir: PathBuf,
    pub total_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub manifest: ArtifactManifest,
}

/// Train on the configured dataset and persist the full artifact set.
/// Nothing is returned unless the save succeeded.
pub fn train_and_save(config: &PipelineConfig) -> PipelineResult<TrainedModel> {
    log::info!("Training run started (dataset {})", config.dataset_path.display());

    let data = dataset::load(&config.dataset_path)?;
    let split = dataset::split(&data, config.test_fraction, config.seed)?;

    let imputer = MeanImputer::fit_samples(&split.train)?;
    let x_train = imputer.transform_all(&split.train);
    let y_train: Vec<Label> = split.train.iter().map(|s| s.label).collect();
    let x_test = imputer.transform_all(&split.test);
    let y_test: Vec<Label> = split.test.iter().map(|s| s.label).collect();

    let params = config.forest_params();
    let forest = RandomForest::fit(&x_train, &y_train, params)?;

    let store = config.store();
    let manifest = ArtifactManifest::new(
        config.seed,
        config.test_fraction,
        params,
        split.train.len(),
        split.test.len(),
    );
    let manifest = store.save(&imputer, &forest, &x_test, &y_test, &manifest)?;

    let summary = TrainingSummary {
        dataset_path: config.dataset_path.clone(),
        model_path: store.classifier_path(),
        test_data_dir: store.test_data_dir(),
        total_rows: data.len(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        manifest,
    };

    log::info!(
        "Training run finished: {} train / {} test rows",
        summary.train_rows,
        summary.test_rows
    );

    Ok(TrainedModel { imputer, forest, summary })
}

/// Complete, impute and classify one operator reading
pub fn assess(
    imputer: &MeanImputer,
    classifier: &impl Classifier,
    input: &OperatorInput,
) -> PipelineResult<RiskAssessment> {
    let vector = imputer.transform_complete(&input.to_feature_vector());
    let probability = classifier.predict_proba(&vector)?;
    let assessment = risk::classify(probability);

    log::info!(
        "Assessment: pH={} turbidity={} conductivity={} -> {:.2}% ({})",
        input.ph,
        input.turbidity,
        input.conductivity,
        assessment.percent(),
        assessment.tier
    );

    Ok(assessment)
}

impl TrainedModel {
    pub fn assess(&self, input: &OperatorInput) -> PipelineResult<RiskAssessment> {
        assess(&self.imputer, &self.forest, input)
    }
}
