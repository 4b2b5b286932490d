//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! Paths are resolved relative to the program root, which can be moved
//! with the `AQUA_SHIELD_ROOT` environment variable.

use std::path::PathBuf;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Aqua-Shield";

// ============================================
// Training parameters
// ============================================

/// Seed shared by the train/test split and the forest
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of the dataset held out for evaluation
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Number of trees in the ensemble
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Maximum depth of each tree
pub const DEFAULT_MAX_DEPTH: usize = 5;

// ============================================
// Directory and file layout
// ============================================

pub const DATA_DIR: &str = "data";
pub const MODEL_DIR: &str = "models";
pub const TEST_DATA_DIR: &str = "test_data";

pub const DEFAULT_DATASET_FILE: &str = "Water_Quality_Prediction_red.csv";
pub const MODEL_FILE: &str = "trained_model.json";
pub const IMPUTER_FILE: &str = "imputer.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const X_TEST_FILE: &str = "X_test.csv";
pub const Y_TEST_FILE: &str = "y_test.csv";
pub const LOG_FILE: &str = "app.log";

/// Name of the label column in every CSV
pub const TARGET_COLUMN: &str = "Target";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get program root from environment or use the working directory
pub fn get_root_dir() -> PathBuf {
    std::env::var("AQUA_SHIELD_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Get dataset file name from environment or use default
pub fn get_dataset_file() -> String {
    std::env::var("AQUA_SHIELD_DATASET")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATASET_FILE.to_string())
}
