//! Evaluation Context
//!
//! Loads the classifier and the frozen test split once, predicts every test
//! row and caches the result together with the manifest fingerprint. Each
//! query re-checks the fingerprint, so a retrain in between is picked up.
//! The cache is only ever built from one `ArtifactSnapshot`, so it never
//! pairs a classifier with a test split from a different save.

use parking_lot::Mutex;

use crate::logic::artifacts::{ArtifactManifest, ArtifactSnapshot, ArtifactStore, TestSet};
use crate::logic::dataset::Label;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::model::RandomForest;
use super::metrics::{
    report_from_matrix, roc_curve, ClassificationReport, ConfusionMatrix, RocCurve,
};

/// Snapshot loads retried when a save replaced the set mid-read
const SNAPSHOT_ATTEMPTS: usize = 3;

struct EvaluationCache {
    fingerprint: String,
    manifest: ArtifactManifest,
    classifier: RandomForest,
    test_set: TestSet,
    predicted: Vec<Label>,
    scores: Vec<f64>,
    confusion: ConfusionMatrix,
}

pub struct EvaluationContext {
    store: ArtifactStore,
    cache: Mutex<Option<EvaluationCache>>,
}

impl EvaluationContext {
    pub fn new(store: ArtifactStore) -> Self {
        Self {
            store,
            cache: Mutex::new(None),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cache.lock().is_some()
    }

    /// Load artifacts and predict the test set, unless the cache already
    /// matches what is on disk
    pub fn initialize(&self) -> PipelineResult<()> {
        let fingerprint = self
            .store
            .fingerprint()
            .ok_or_else(|| PipelineError::ArtifactNotFound(self.store.manifest_path()))?;

        let mut cache = self.cache.lock();
        if let Some(existing) = cache.as_ref() {
            if existing.fingerprint == fingerprint {
                return Ok(());
            }
            log::info!("Artifacts changed on disk, rebuilding evaluation cache");
        }

        // Drop the stale cache first so a failed rebuild never serves it
        *cache = None;
        let snapshot = self.load_snapshot(fingerprint)?;
        *cache = Some(build_cache(snapshot)?);
        Ok(())
    }

    fn load_snapshot(&self, mut fingerprint: String) -> PipelineResult<ArtifactSnapshot> {
        let mut attempt = 1;
        loop {
            match self.store.load_snapshot() {
                Err(PipelineError::CorruptArtifact(reason)) if attempt < SNAPSHOT_ATTEMPTS => {
                    match self.store.fingerprint() {
                        Some(current) if current != fingerprint => {
                            log::warn!("Artifacts replaced while loading ({}), retrying", reason);
                            fingerprint = current;
                            attempt += 1;
                        }
                        _ => return Err(PipelineError::CorruptArtifact(reason)),
                    }
                }
                other => return other,
            }
        }
    }

    fn with_cache<T>(&self, f: impl FnOnce(&EvaluationCache) -> PipelineResult<T>) -> PipelineResult<T> {
        self.initialize()?;
        let cache = self.cache.lock();
        match cache.as_ref() {
            Some(c) => f(c),
            None => Err(PipelineError::NotFitted),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn confusion_matrix(&self) -> PipelineResult<ConfusionMatrix> {
        self.with_cache(|c| Ok(c.confusion))
    }

    pub fn precision_recall_f1(&self) -> PipelineResult<(f64, f64, f64)> {
        self.with_cache(|c| {
            let s = c.confusion.scores_for(Label::Contaminated);
            Ok((s.precision, s.recall, s.f1))
        })
    }

    pub fn classification_report(&self) -> PipelineResult<ClassificationReport> {
        self.with_cache(|c| Ok(report_from_matrix(&c.confusion)))
    }

    pub fn roc_curve(&self) -> PipelineResult<RocCurve> {
        self.with_cache(|c| roc_curve(&c.scores, &c.test_set.labels))
    }

    pub fn manifest(&self) -> PipelineResult<ArtifactManifest> {
        self.with_cache(|c| Ok(c.manifest.clone()))
    }

    /// (tree count, average depth) of the cached classifier
    pub fn model_summary(&self) -> PipelineResult<(usize, f64)> {
        self.with_cache(|c| Ok((c.classifier.n_trees(), c.classifier.avg_depth())))
    }

    pub fn predictions(&self) -> PipelineResult<Vec<Label>> {
        self.with_cache(|c| Ok(c.predicted.clone()))
    }
}

fn build_cache(snapshot: ArtifactSnapshot) -> PipelineResult<EvaluationCache> {
    let ArtifactSnapshot { fingerprint, manifest, classifier, test_set } = snapshot;

    let mut scores = Vec::with_capacity(test_set.len());
    let mut predicted = Vec::with_capacity(test_set.len());
    for vector in &test_set.features {
        let prediction = classifier.predict(vector)?;
        scores.push(prediction.probability);
        predicted.push(prediction.label);
    }
    let confusion = ConfusionMatrix::from_labels(&test_set.labels, &predicted)?;

    log::info!(
        "Evaluation cache ready: {} test rows, accuracy {:.4}",
        test_set.len(),
        confusion.accuracy()
    );

    Ok(EvaluationCache {
        fingerprint,
        manifest,
        classifier,
        test_set,
        predicted,
        scores,
        confusion,
    })
}
