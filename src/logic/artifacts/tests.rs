use std::fs;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::manifest::ArtifactManifest;
use super::storage::ArtifactStore;
use crate::logic::dataset::Label;
use crate::logic::error::PipelineError;
use crate::logic::features::{FeatureVector, RawFeatureVector, FEATURE_COUNT};
use crate::logic::model::{Classifier, ForestParams, MeanImputer, RandomForest};

fn fixture() -> (MeanImputer, RandomForest, Vec<FeatureVector>, Vec<Label>) {
    // Irregular measurements so split thresholds land on arbitrary midpoints
    let mut rng = StdRng::seed_from_u64(9);
    let raw: Vec<RawFeatureVector> = (0..60)
        .map(|i| {
            let mut values = [Some(0.5); FEATURE_COUNT];
            values[0] = Some((i % 14) as f64 + rng.gen_range(0.0..1.0));
            values[6] = if i % 7 == 0 { None } else { Some(rng.gen_range(0.0..2000.0)) };
            values[11] = Some(rng.gen_range(0.0..2000.0));
            RawFeatureVector::new(values)
        })
        .collect();
    let labels: Vec<Label> = (0..60)
        .map(|i| if (i % 14) < 5 { Label::Contaminated } else { Label::Good })
        .collect();

    let imputer = MeanImputer::fit(&raw).unwrap();
    let x: Vec<FeatureVector> = raw.iter().map(|r| imputer.transform(r)).collect();
    let params = ForestParams { n_estimators: 10, ..Default::default() };
    let forest = RandomForest::fit(&x, &labels, params).unwrap();

    (imputer, forest, x[..12].to_vec(), labels[..12].to_vec())
}

fn manifest(test_rows: usize) -> ArtifactManifest {
    let params = ForestParams { n_estimators: 10, ..Default::default() };
    ArtifactManifest::new(42, 0.2, params, 48, test_rows)
}

fn random_readings(n: usize) -> Vec<FeatureVector> {
    let mut rng = StdRng::seed_from_u64(1234);
    (0..n)
        .map(|_| {
            let mut values = [0.0; FEATURE_COUNT];
            for v in values.iter_mut() {
                *v = rng.gen_range(0.0..2000.0);
            }
            values[0] = rng.gen_range(0.0..14.0);
            FeatureVector::from_values(values)
        })
        .collect()
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    let written = store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();
    assert!(written.checksums.is_some());
    assert!(store.exists());

    let loaded_imputer = store.load_imputer().unwrap();
    let loaded_forest = store.load_classifier().unwrap();
    let test_set = store.load_test_set().unwrap();

    assert_eq!(loaded_imputer, imputer);
    assert_eq!(loaded_forest, forest);
    for reading in random_readings(2000) {
        assert_eq!(
            loaded_forest.predict_proba(&reading).unwrap().to_bits(),
            forest.predict_proba(&reading).unwrap().to_bits()
        );
    }
    // Shortest round-trip formatting: bit-identical floats
    assert_eq!(test_set.features, x_test);
    assert_eq!(test_set.labels, y_test);
    assert_eq!(store.load_manifest().unwrap(), written);
}

#[test]
fn test_not_found_before_training() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    assert!(!store.exists());
    assert!(store.fingerprint().is_none());
    assert!(matches!(store.load_classifier(), Err(PipelineError::ArtifactNotFound(_))));
    assert!(matches!(store.load_imputer(), Err(PipelineError::ArtifactNotFound(_))));
    assert!(matches!(store.load_test_set(), Err(PipelineError::ArtifactNotFound(_))));
}

#[test]
fn test_failed_save_leaves_no_partial_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    // A directory where the classifier temp file should go makes staging fail
    fs::create_dir_all(dir.path().join("models").join("trained_model.json.tmp")).unwrap();

    let result = store.save(&imputer, &forest, &x_test, &y_test, &manifest(12));
    assert!(matches!(result, Err(PipelineError::Io(_))));

    assert!(!store.exists());
    assert!(!store.imputer_path().exists());
    assert!(!dir.path().join("models").join("imputer.json.tmp").exists());
    assert!(!store.manifest_path().exists());
}

#[test]
fn test_failed_save_keeps_previous_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();
    let before = store.fingerprint();

    fs::create_dir_all(dir.path().join("test_data").join("y_test.csv.tmp")).unwrap();
    assert!(store.save(&imputer, &forest, &x_test[..6], &y_test[..6], &manifest(6)).is_err());

    assert_eq!(store.fingerprint(), before);
    assert_eq!(store.load_test_set().unwrap().len(), 12);
}

#[test]
fn test_failed_swap_restores_previous_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();
    let before = store.fingerprint();
    let classifier_before = fs::read(store.classifier_path()).unwrap();

    // Blobs swap in fine, then moving the old manifest aside fails
    fs::create_dir_all(dir.path().join("models").join("manifest.json.bak").join("held")).unwrap();

    let other = RandomForest::fit(&x_test, &y_test, ForestParams { n_estimators: 3, ..Default::default() }).unwrap();
    assert!(store.save(&imputer, &other, &x_test[..6], &y_test[..6], &manifest(6)).is_err());

    assert_eq!(store.fingerprint(), before);
    assert_eq!(fs::read(store.classifier_path()).unwrap(), classifier_before);
    assert_eq!(store.load_classifier().unwrap(), forest);
    assert_eq!(store.load_test_set().unwrap().len(), 12);
    assert!(!dir.path().join("models").join("trained_model.json.bak").exists());
    assert!(!dir.path().join("models").join("trained_model.json.tmp").exists());
    assert!(!dir.path().join("test_data").join("X_test.csv.bak").exists());
}

#[test]
fn test_successful_save_leaves_no_backups() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();
    store.save(&imputer, &forest, &x_test[..6], &y_test[..6], &manifest(6)).unwrap();

    for entry in fs::read_dir(store.model_dir()).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().into_owned();
        assert!(!name.ends_with(".bak") && !name.ends_with(".tmp"), "leftover {}", name);
    }
    assert_eq!(store.load_test_set().unwrap().len(), 6);
}

#[test]
fn test_snapshot_matches_single_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();
    let snapshot = store.load_snapshot().unwrap();
    assert_eq!(Some(snapshot.fingerprint.clone()), store.fingerprint());
    assert_eq!(snapshot.classifier, forest);
    assert_eq!(snapshot.test_set.len(), 12);
    assert_eq!(snapshot.manifest.test_rows, 12);
}

#[test]
fn test_snapshot_refuses_blobs_from_another_save() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();
    let first_manifest = fs::read(store.manifest_path()).unwrap();

    // Overwritten after the manifest was read but before the blobs were
    let other = RandomForest::fit(&x_test, &y_test, ForestParams { n_estimators: 3, ..Default::default() }).unwrap();
    store.save(&imputer, &other, &x_test[..6], &y_test[..6], &manifest(6)).unwrap();

    assert!(matches!(
        store.snapshot_from(&first_manifest),
        Err(PipelineError::CorruptArtifact(_))
    ));

    let current = store.load_snapshot().unwrap();
    assert_eq!(current.classifier, other);
    assert_eq!(current.test_set.len(), 6);
}

#[test]
fn test_tampered_blob_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();
    store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();

    let mut bytes = fs::read(store.imputer_path()).unwrap();
    bytes.push(b' ');
    fs::write(store.imputer_path(), bytes).unwrap();

    assert!(matches!(store.load_imputer(), Err(PipelineError::CorruptArtifact(_))));
    // Untouched blobs still load
    assert!(store.load_classifier().is_ok());
}

#[test]
fn test_layout_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    let mut stale = manifest(12);
    stale.layout.hash = !stale.layout.hash;
    store.save(&imputer, &forest, &x_test, &y_test, &stale).unwrap();

    match store.load_classifier() {
        Err(PipelineError::LayoutMismatch { expected_hash, actual_hash, .. }) => {
            assert_ne!(expected_hash, actual_hash);
        }
        other => panic!("Expected LayoutMismatch, got {:?}", other.map(|f| f.n_trees())),
    }
}

#[test]
fn test_fingerprint_changes_on_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    store.save(&imputer, &forest, &x_test, &y_test, &manifest(12)).unwrap();
    let first = store.fingerprint().unwrap();

    store.save(&imputer, &forest, &x_test[..6], &y_test[..6], &manifest(6)).unwrap();
    let second = store.fingerprint().unwrap();

    assert_ne!(first, second);
    assert_eq!(first.len(), 64);
}

#[test]
fn test_mismatched_test_rows_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let (imputer, forest, x_test, y_test) = fixture();

    assert!(store.save(&imputer, &forest, &x_test, &y_test[..3], &manifest(12)).is_err());
    assert!(!store.exists());
}
