//! Artifact Manifest
//!
//! Written last on every save. Describes how the artifact set was produced
//! and carries the SHA-256 of every blob so a torn or edited set is caught
//! on load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::APP_VERSION;
use crate::logic::features::layout::is_layout_compatible;
use crate::logic::features::LayoutInfo;
use crate::logic::model::ForestParams;

pub const MANIFEST_FORMAT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactChecksums {
    pub imputer: String,
    pub classifier: String,
    pub x_test: String,
    pub y_test: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format: u32,
    pub app_version: String,
    pub layout: LayoutInfo,
    pub seed: u64,
    pub test_fraction: f64,
    pub forest: ForestParams,
    pub train_rows: usize,
    pub test_rows: usize,
    pub trained_at: DateTime<Utc>,
    /// Filled in by the store at save time
    pub checksums: Option<ArtifactChecksums>,
}

impl ArtifactManifest {
    pub fn new(
        seed: u64,
        test_fraction: f64,
        forest: ForestParams,
        train_rows: usize,
        test_rows: usize,
    ) -> Self {
        Self {
            format: MANIFEST_FORMAT,
            app_version: APP_VERSION.to_string(),
            layout: LayoutInfo::current(),
            seed,
            test_fraction,
            forest,
            train_rows,
            test_rows,
            trained_at: Utc::now(),
            checksums: None,
        }
    }

    pub fn is_layout_compatible(&self) -> bool {
        is_layout_compatible(self.layout.version, self.layout.hash)
    }
}

/// SHA-256 of `bytes`, lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
