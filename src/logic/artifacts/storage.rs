//! Artifact Storage
//!
//! Layout under the program root:
//! - models/imputer.json
//! - models/trained_model.json
//! - models/manifest.json
//! - test_data/X_test.csv (imputed test features)
//! - test_data/y_test.csv
//!
//! Saves are staged: every file goes to a `.tmp` sibling first and is only
//! renamed into place once all writes succeeded, manifest last. The files
//! being replaced are moved to `.bak` siblings during the swap and put back
//! if any rename fails, so a failed save leaves the previous set loadable.
//!
//! Readers that need several blobs at once go through `load_snapshot`, which
//! verifies all of them against a single manifest read.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    IMPUTER_FILE, MANIFEST_FILE, MODEL_DIR, MODEL_FILE, TARGET_COLUMN, TEST_DATA_DIR, X_TEST_FILE,
    Y_TEST_FILE,
};
use crate::logic::dataset::loader::{column_position, parse_cell, parse_label, resolve_columns, split_record};
use crate::logic::dataset::Label;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::layout::FEATURE_VERSION;
use crate::logic::features::{FeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::model::{MeanImputer, RandomForest};
use super::manifest::{sha256_hex, ArtifactChecksums, ArtifactManifest};

/// Frozen test split as stored on disk (already imputed)
#[derive(Debug, Clone, PartialEq)]
pub struct TestSet {
    pub features: Vec<FeatureVector>,
    pub labels: Vec<Label>,
}

impl TestSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Manifest, classifier and test split that belong to the same save
#[derive(Debug, Clone)]
pub struct ArtifactSnapshot {
    /// SHA-256 of the manifest bytes the blobs were verified against
    pub fingerprint: String,
    pub manifest: ArtifactManifest,
    pub classifier: RandomForest,
    pub test_set: TestSet,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // ========================================================================
    // PATHS
    // ========================================================================

    pub fn model_dir(&self) -> PathBuf {
        self.root.join(MODEL_DIR)
    }

    pub fn test_data_dir(&self) -> PathBuf {
        self.root.join(TEST_DATA_DIR)
    }

    pub fn imputer_path(&self) -> PathBuf {
        self.model_dir().join(IMPUTER_FILE)
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.model_dir().join(MODEL_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.model_dir().join(MANIFEST_FILE)
    }

    pub fn x_test_path(&self) -> PathBuf {
        self.test_data_dir().join(X_TEST_FILE)
    }

    pub fn y_test_path(&self) -> PathBuf {
        self.test_data_dir().join(Y_TEST_FILE)
    }

    /// Training has completed at least once
    pub fn exists(&self) -> bool {
        self.manifest_path().is_file() && self.classifier_path().is_file()
    }

    /// SHA-256 of the manifest bytes; changes on every successful save
    pub fn fingerprint(&self) -> Option<String> {
        fs::read(self.manifest_path()).ok().map(|bytes| sha256_hex(&bytes))
    }

    // ========================================================================
    // SAVE
    // ========================================================================

    /// Persist a complete artifact set, replacing any previous one.
    /// Returns the manifest as written (checksums filled in).
    pub fn save(
        &self,
        imputer: &MeanImputer,
        forest: &RandomForest,
        test_features: &[FeatureVector],
        test_labels: &[Label],
        manifest: &ArtifactManifest,
    ) -> PipelineResult<ArtifactManifest> {
        if test_features.len() != test_labels.len() {
            return Err(PipelineError::InsufficientData(format!(
                "{} test rows but {} test labels",
                test_features.len(),
                test_labels.len()
            )));
        }

        fs::create_dir_all(self.model_dir())?;
        fs::create_dir_all(self.test_data_dir())?;

        let imputer_bytes = serde_json::to_vec_pretty(imputer)?;
        let classifier_bytes = serde_json::to_vec(forest)?;
        let x_test_bytes = encode_features(test_features).into_bytes();
        let y_test_bytes = encode_labels(test_labels).into_bytes();

        let mut manifest = manifest.clone();
        manifest.checksums = Some(ArtifactChecksums {
            imputer: sha256_hex(&imputer_bytes),
            classifier: sha256_hex(&classifier_bytes),
            x_test: sha256_hex(&x_test_bytes),
            y_test: sha256_hex(&y_test_bytes),
        });
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;

        let staged = [
            (self.imputer_path(), imputer_bytes),
            (self.classifier_path(), classifier_bytes),
            (self.x_test_path(), x_test_bytes),
            (self.y_test_path(), y_test_bytes),
            (self.manifest_path(), manifest_bytes),
        ];

        commit(&staged)?;

        log::info!(
            "Saved artifacts to {} ({} test rows, {} trees)",
            self.root.display(),
            test_labels.len(),
            forest.n_trees()
        );

        Ok(manifest)
    }

    // ========================================================================
    // LOAD
    // ========================================================================

    /// Read the manifest and check it against the current feature layout
    pub fn load_manifest(&self) -> PipelineResult<ArtifactManifest> {
        let bytes = read_artifact(&self.manifest_path())?;
        decode_manifest(&bytes)
    }

    pub fn load_imputer(&self) -> PipelineResult<MeanImputer> {
        let manifest = self.load_manifest()?;
        let bytes = self.read_verified(&self.imputer_path(), |c| &c.imputer, &manifest)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn load_classifier(&self) -> PipelineResult<RandomForest> {
        let manifest = self.load_manifest()?;
        self.classifier_for(&manifest)
    }

    pub fn load_test_set(&self) -> PipelineResult<TestSet> {
        let manifest = self.load_manifest()?;
        self.test_set_for(&manifest)
    }

    /// Classifier and test split checked against one manifest read.
    /// A save racing with this call yields `CorruptArtifact`, never a mix.
    pub fn load_snapshot(&self) -> PipelineResult<ArtifactSnapshot> {
        let manifest_bytes = read_artifact(&self.manifest_path())?;
        self.snapshot_from(&manifest_bytes)
    }

    pub(super) fn snapshot_from(&self, manifest_bytes: &[u8]) -> PipelineResult<ArtifactSnapshot> {
        let manifest = decode_manifest(manifest_bytes)?;
        let classifier = self.classifier_for(&manifest)?;
        let test_set = self.test_set_for(&manifest)?;

        Ok(ArtifactSnapshot {
            fingerprint: sha256_hex(manifest_bytes),
            manifest,
            classifier,
            test_set,
        })
    }

    fn classifier_for(&self, manifest: &ArtifactManifest) -> PipelineResult<RandomForest> {
        let bytes = self.read_verified(&self.classifier_path(), |c| &c.classifier, manifest)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn test_set_for(&self, manifest: &ArtifactManifest) -> PipelineResult<TestSet> {
        let x_bytes = self.read_verified(&self.x_test_path(), |c| &c.x_test, manifest)?;
        let y_bytes = self.read_verified(&self.y_test_path(), |c| &c.y_test, manifest)?;

        let features = decode_features(&String::from_utf8_lossy(&x_bytes))?;
        let labels = decode_labels(&String::from_utf8_lossy(&y_bytes))?;

        if features.len() != labels.len() {
            return Err(PipelineError::CorruptArtifact(format!(
                "{} has {} rows, {} has {}",
                X_TEST_FILE,
                features.len(),
                Y_TEST_FILE,
                labels.len()
            )));
        }

        log::debug!("Loaded test set: {} rows", labels.len());
        Ok(TestSet { features, labels })
    }

    fn read_verified(
        &self,
        path: &Path,
        expected: impl Fn(&ArtifactChecksums) -> &String,
        manifest: &ArtifactManifest,
    ) -> PipelineResult<Vec<u8>> {
        let bytes = read_artifact(path)?;
        let checksums = manifest
            .checksums
            .as_ref()
            .ok_or_else(|| PipelineError::CorruptArtifact("manifest has no checksums".to_string()))?;

        let actual = sha256_hex(&bytes);
        if &actual != expected(checksums) {
            log::error!("Checksum mismatch for {}", path.display());
            return Err(PipelineError::CorruptArtifact(format!(
                "checksum mismatch for {}",
                path.display()
            )));
        }
        Ok(bytes)
    }
}

fn decode_manifest(bytes: &[u8]) -> PipelineResult<ArtifactManifest> {
    let manifest: ArtifactManifest = serde_json::from_slice(bytes)
        .map_err(|e| PipelineError::CorruptArtifact(format!("{}: {}", MANIFEST_FILE, e)))?;

    if !manifest.is_layout_compatible() {
        log::warn!(
            "Artifact layout v{} ({:08x}) does not match current layout",
            manifest.layout.version,
            manifest.layout.hash
        );
        return Err(PipelineError::LayoutMismatch {
            expected_version: FEATURE_VERSION,
            expected_hash: crate::logic::features::layout::layout_hash(),
            actual_version: manifest.layout.version,
            actual_hash: manifest.layout.hash,
        });
    }

    Ok(manifest)
}

// ============================================================================
// STAGED COMMIT
// ============================================================================

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn tmp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

fn bak_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

fn remove_temps(staged: &[(PathBuf, Vec<u8>)]) {
    for (path, _) in staged {
        let tmp = tmp_path(path);
        if tmp.is_file() {
            let _ = fs::remove_file(&tmp);
        }
    }
}

/// One file moved into place; `backed_up` when an older version sits at `.bak`
struct Swapped<'a> {
    path: &'a Path,
    backed_up: bool,
}

/// Undo swaps newest first: drop the new file, restore its backup
fn roll_back(swapped: &[Swapped<'_>]) {
    for entry in swapped.iter().rev() {
        let _ = fs::remove_file(entry.path);
        if entry.backed_up {
            if let Err(e) = fs::rename(bak_path(entry.path), entry.path) {
                log::error!("Failed to restore {}: {}", entry.path.display(), e);
            }
        }
    }
}

/// Move `path` aside and the staged temp into its place
fn swap_in(path: &Path) -> std::io::Result<bool> {
    let backed_up = path.is_file();
    if backed_up {
        fs::rename(path, bak_path(path))?;
    }
    if let Err(e) = fs::rename(tmp_path(path), path) {
        if backed_up {
            let _ = fs::rename(bak_path(path), path);
        }
        return Err(e);
    }
    Ok(backed_up)
}

/// Write every blob to its `.tmp` sibling, then swap them in order.
/// The last entry (manifest) is only swapped after all others.
fn commit(staged: &[(PathBuf, Vec<u8>)]) -> PipelineResult<()> {
    for (path, bytes) in staged {
        if let Err(e) = fs::write(tmp_path(path), bytes) {
            log::error!("Failed to stage {}: {}", path.display(), e);
            remove_temps(staged);
            return Err(e.into());
        }
    }

    let mut swapped = Vec::with_capacity(staged.len());
    for (path, _) in staged {
        match swap_in(path) {
            Ok(backed_up) => swapped.push(Swapped { path: path.as_path(), backed_up }),
            Err(e) => {
                log::error!("Failed to commit {}: {}", path.display(), e);
                roll_back(&swapped);
                remove_temps(staged);
                return Err(e.into());
            }
        }
    }

    for entry in swapped.iter().filter(|s| s.backed_up) {
        let _ = fs::remove_file(bak_path(entry.path));
    }
    Ok(())
}

fn read_artifact(path: &Path) -> PipelineResult<Vec<u8>> {
    if !path.is_file() {
        return Err(PipelineError::ArtifactNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

// ============================================================================
// TEST SET CSV
// ============================================================================

fn encode_features(rows: &[FeatureVector]) -> String {
    let mut out = FEATURE_LAYOUT.join(",");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn encode_labels(labels: &[Label]) -> String {
    let mut out = String::from(TARGET_COLUMN);
    out.push('\n');
    for label in labels {
        out.push_str(&label.to_string());
        out.push('\n');
    }
    out
}

fn corrupt(file: &str, line: usize, reason: impl std::fmt::Display) -> PipelineError {
    PipelineError::CorruptArtifact(format!("{} line {}: {}", file, line, reason))
}

fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty())
}

fn decode_features(content: &str) -> PipelineResult<Vec<FeatureVector>> {
    let mut lines = data_lines(content);
    let (_, header) = lines
        .next()
        .ok_or_else(|| PipelineError::CorruptArtifact(format!("{} is empty", X_TEST_FILE)))?;
    let columns = resolve_columns(&split_record(header), FEATURE_LAYOUT)?;

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let fields = split_record(line);
        let mut values = [0.0f64; FEATURE_COUNT];
        for (slot, &col) in values.iter_mut().zip(&columns) {
            let cell = fields.get(col).map(String::as_str).unwrap_or("");
            *slot = parse_cell(cell)
                .map_err(|reason| corrupt(X_TEST_FILE, line_no, reason))?
                .ok_or_else(|| corrupt(X_TEST_FILE, line_no, "missing value in imputed test set"))?;
        }
        rows.push(FeatureVector::from_values(values));
    }
    Ok(rows)
}

fn decode_labels(content: &str) -> PipelineResult<Vec<Label>> {
    let mut lines = data_lines(content);
    let (_, header) = lines
        .next()
        .ok_or_else(|| PipelineError::CorruptArtifact(format!("{} is empty", Y_TEST_FILE)))?;
    let target = column_position(&split_record(header), TARGET_COLUMN)?;

    lines
        .map(|(line_no, line)| {
            let fields = split_record(line);
            parse_label(fields.get(target).map(String::as_str).unwrap_or(""))
                .map_err(|reason| corrupt(Y_TEST_FILE, line_no, reason))
        })
        .collect()
}
