//! Mean Imputer
//!
//! Fit on the training split only. `transform` never looks at anything but
//! the stored means, so test rows and operator input can't leak into them.

use serde::{Deserialize, Serialize};

use crate::logic::dataset::LabeledSample;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{FeatureVector, RawFeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanImputer {
    /// One mean per feature, layout order
    pub means: [f64; FEATURE_COUNT],
    /// Observed (non-missing) count per feature at fit time
    pub observed: [usize; FEATURE_COUNT],
}

impl MeanImputer {
    /// Learn per-feature means from raw training vectors
    pub fn fit<'a, I>(rows: I) -> PipelineResult<Self>
    where
        I: IntoIterator<Item = &'a RawFeatureVector>,
    {
        let mut sums = [0.0f64; FEATURE_COUNT];
        let mut observed = [0usize; FEATURE_COUNT];

        for row in rows {
            for (i, value) in row.values.iter().enumerate() {
                if let Some(v) = value {
                    sums[i] += v;
                    observed[i] += 1;
                }
            }
        }

        let mut means = [0.0f64; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            if observed[i] == 0 {
                log::error!("Feature '{}' has no observed values in training set", FEATURE_LAYOUT[i]);
                return Err(PipelineError::DegenerateFeature(FEATURE_LAYOUT[i].to_string()));
            }
            means[i] = sums[i] / observed[i] as f64;
        }

        Ok(Self { means, observed })
    }

    /// Convenience for labeled training samples
    pub fn fit_samples(train: &[LabeledSample]) -> PipelineResult<Self> {
        Self::fit(train.iter().map(|s| &s.features))
    }

    /// Fill missing slots with the stored means
    pub fn transform(&self, raw: &RawFeatureVector) -> FeatureVector {
        let mut values = [0.0f64; FEATURE_COUNT];
        for (i, slot) in values.iter_mut().enumerate() {
            *slot = raw.values[i].unwrap_or(self.means[i]);
        }
        FeatureVector::from_values(values)
    }

    /// Operator vectors are already complete
    pub fn transform_complete(&self, vector: &FeatureVector) -> FeatureVector {
        self.transform(&RawFeatureVector::from(*vector))
    }

    pub fn transform_all(&self, rows: &[LabeledSample]) -> Vec<FeatureVector> {
        rows.iter().map(|s| self.transform(&s.features)).collect()
    }

    pub fn mean_of(&self, feature: &str) -> Option<f64> {
        crate::logic::features::layout::feature_index(feature).map(|i| self.means[i])
    }
}
