//! Random Forest - bagged ensemble of CART trees
//!
//! Every tree sees a bootstrap resample of the training rows and draws
//! `max_features` candidate features per split. Tree seeds come from one
//! master StdRng seeded with the training seed, so refitting the same data
//! gives the same forest.
//!
//! predict_proba = mean of the tree leaf probabilities.
//! predict_label = Contaminated iff predict_proba > 0.5.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_N_ESTIMATORS, DEFAULT_SEED};
use crate::logic::dataset::Label;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::tree::{default_max_features, DecisionTree, TreeParams};
use super::Classifier;

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub max_features: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_features: default_max_features(FEATURE_COUNT),
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestParams {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            max_features: self.max_features,
            min_samples_split: 2,
        }
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// P(Contaminated), 0.0 - 1.0
    pub probability: f64,
}

// ============================================================================
// FOREST
// ============================================================================

/// `Default` is the unfitted artifact: every prediction returns NotFitted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RandomForest {
    params: Option<ForestParams>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn fit(x: &[FeatureVector], y: &[Label], params: ForestParams) -> PipelineResult<Self> {
        if x.is_empty() {
            return Err(PipelineError::InsufficientData("empty training set".to_string()));
        }
        if x.len() != y.len() {
            return Err(PipelineError::InsufficientData(format!(
                "{} feature rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if params.n_estimators == 0 {
            return Err(PipelineError::InsufficientData("forest needs at least one tree".to_string()));
        }

        let start = std::time::Instant::now();
        let tree_params = params.tree_params();
        let mut master = StdRng::seed_from_u64(params.seed);
        let n = x.len();

        let mut trees = Vec::with_capacity(params.n_estimators);
        for _ in 0..params.n_estimators {
            let mut rng = StdRng::seed_from_u64(master.gen());
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(DecisionTree::fit(x, y, &bootstrap, &tree_params, &mut rng));
        }

        let forest = Self { params: Some(params), trees };

        log::info!(
            "Trained forest: {} trees, max_depth {}, avg depth {:.2}, {} nodes in {} ms",
            forest.n_trees(),
            params.max_depth,
            forest.avg_depth(),
            forest.total_nodes(),
            start.elapsed().as_millis()
        );

        Ok(forest)
    }

    pub fn predict(&self, vector: &FeatureVector) -> PipelineResult<Prediction> {
        let probability = self.predict_proba(vector)?;
        Ok(Prediction {
            label: label_for(probability),
            probability,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
    }
}

impl Classifier for RandomForest {
    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    fn predict_proba(&self, vector: &FeatureVector) -> PipelineResult<f64> {
        if !self.is_fitted() {
            return Err(PipelineError::NotFitted);
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(vector.as_slice())).sum();
        Ok((sum / self.trees.len() as f64).clamp(0.0, 1.0))
    }
}

fn label_for(probability: f64) -> Label {
    if probability > 0.5 {
        Label::Contaminated
    } else {
        Label::Good
    }
}
