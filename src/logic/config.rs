//! Pipeline Configuration
//!
//! Resolved paths and training parameters for one run. `Default` reads the
//! environment through `constants`; tests build one with `with_root`.

use std::path::{Path, PathBuf};

use crate::constants::{
    get_dataset_file, get_root_dir, DATA_DIR, DEFAULT_DATASET_FILE, DEFAULT_SEED,
    DEFAULT_TEST_FRACTION,
};
use crate::logic::artifacts::ArtifactStore;
use crate::logic::model::ForestParams;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub root: PathBuf,
    pub dataset_path: PathBuf,
    /// Shared by the split and the forest
    pub seed: u64,
    pub test_fraction: f64,
    pub forest: ForestParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let root = get_root_dir();
        let dataset_path = root.join(DATA_DIR).join(get_dataset_file());
        Self::build(root, dataset_path)
    }
}

impl PipelineConfig {
    /// Config rooted at `root` with the default dataset name, env ignored
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let dataset_path = root.join(DATA_DIR).join(DEFAULT_DATASET_FILE);
        Self::build(root, dataset_path)
    }

    fn build(root: PathBuf, dataset_path: PathBuf) -> Self {
        Self {
            root,
            dataset_path,
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            forest: ForestParams::default(),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.root)
    }

    /// Forest parameters with the run seed applied
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            seed: self.seed,
            ..self.forest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root_layout() {
        let config = PipelineConfig::with_root("/tmp/aqua");
        assert_eq!(
            config.dataset_path,
            PathBuf::from("/tmp/aqua/data/Water_Quality_Prediction_red.csv")
        );
        assert_eq!(config.seed, 42);
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.forest.n_estimators, 100);
        assert_eq!(config.forest.max_depth, 5);
        assert_eq!(config.store().classifier_path(), PathBuf::from("/tmp/aqua/models/trained_model.json"));
    }

    #[test]
    fn test_seed_flows_into_forest() {
        let mut config = PipelineConfig::with_root(".");
        config.seed = 7;
        assert_eq!(config.forest_params().seed, 7);
    }
}
