//! Train/Test Splitter
//!
//! Deterministic in (dataset, test_fraction, seed): indices are shuffled by a
//! seeded StdRng, the first ceil(n * fraction) go to the test set.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::logic::error::{PipelineError, PipelineResult};
use super::record::{Dataset, LabeledSample};

/// Disjoint cover of a Dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<LabeledSample>,
    pub test: Vec<LabeledSample>,
    /// Source row index of each train sample, in train order
    pub train_indices: Vec<usize>,
    /// Source row index of each test sample, in test order
    pub test_indices: Vec<usize>,
}

pub fn split(dataset: &Dataset, test_fraction: f64, seed: u64) -> PipelineResult<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InsufficientData(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let n = dataset.len();
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::InsufficientData(format!(
            "{} samples cannot be split into non-empty train and test sets",
            n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_indices, train_indices) = indices.split_at(n_test);
    let samples = dataset.samples();

    let result = Split {
        train: train_indices.iter().map(|&i| samples[i].clone()).collect(),
        test: test_indices.iter().map(|&i| samples[i].clone()).collect(),
        train_indices: train_indices.to_vec(),
        test_indices: test_indices.to_vec(),
    };

    log::info!(
        "Split {} samples into {} train / {} test (seed {})",
        n,
        result.train.len(),
        result.test.len(),
        seed
    );

    Ok(result)
}
