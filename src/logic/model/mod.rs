//! Model Module - imputation and classification
//!
//! ## Structure
//! - `imputer`: per-feature mean imputation, fit on the training split
//! - `tree`: single CART tree (Gini)
//! - `forest`: bagged ensemble of trees, the classifier artifact

pub mod imputer;
pub mod tree;
pub mod forest;

pub use imputer::MeanImputer;
pub use tree::{DecisionTree, TreeParams};
pub use forest::{ForestParams, Prediction, RandomForest};

use crate::logic::dataset::Label;
use crate::logic::error::PipelineResult;
use crate::logic::features::FeatureVector;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over complete feature vectors
pub trait Classifier {
    fn is_fitted(&self) -> bool;

    /// P(Contaminated) in [0, 1]
    fn predict_proba(&self, vector: &FeatureVector) -> PipelineResult<f64>;

    fn predict_label(&self, vector: &FeatureVector) -> PipelineResult<Label> {
        let probability = self.predict_proba(vector)?;
        Ok(if probability > 0.5 { Label::Contaminated } else { Label::Good })
    }
}
