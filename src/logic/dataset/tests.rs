use super::loader::{load, parse, split_record};
use super::record::Label;
use super::split::split;
use crate::logic::error::PipelineError;
use crate::logic::features::{FEATURE_COUNT, FEATURE_LAYOUT};
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;

fn header() -> String {
    let mut cols: Vec<&str> = FEATURE_LAYOUT.to_vec();
    cols.push("Target");
    cols.join(",")
}

fn row(base: f64, target: u8) -> String {
    let mut cells: Vec<String> = (0..FEATURE_COUNT).map(|i| format!("{}", base + i as f64)).collect();
    cells.push(target.to_string());
    cells.join(",")
}

fn csv_with_rows(n: usize) -> String {
    let mut out = header();
    for i in 0..n {
        out.push('\n');
        out.push_str(&row(i as f64, (i % 2) as u8));
    }
    out
}

#[test]
fn test_parse_basic_rows() {
    let dataset = parse(&csv_with_rows(4)).unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.positive_count(), 2);

    let first = &dataset.samples()[0];
    assert_eq!(first.label, Label::Good);
    assert_eq!(first.features.get(0), Some(0.0));
    assert_eq!(first.features.get(17), Some(17.0));
}

#[test]
fn test_missing_cells_become_none() {
    let mut cells: Vec<String> = (0..FEATURE_COUNT).map(|_| "1.5".to_string()).collect();
    cells[0] = String::new();
    cells[6] = "NaN".to_string();
    cells.push("1".to_string());
    let content = format!("{}\n{}\n", header(), cells.join(","));

    let dataset = parse(&content).unwrap();
    let sample = &dataset.samples()[0];
    assert_eq!(sample.features.get(0), None);
    assert_eq!(sample.features.get(6), None);
    assert_eq!(sample.features.get(1), Some(1.5));
    assert_eq!(sample.features.missing_count(), 2);
    assert_eq!(sample.label, Label::Contaminated);
}

#[test]
fn test_column_order_is_free() {
    // Reverse the header and the row together
    let mut cols: Vec<String> = header().split(',').map(String::from).collect();
    let mut cells: Vec<String> = row(10.0, 1).split(',').map(String::from).collect();
    cols.reverse();
    cells.reverse();
    let content = format!("Index,{}\n99,{}", cols.join(","), cells.join(","));

    let dataset = parse(&content).unwrap();
    let sample = &dataset.samples()[0];
    assert_eq!(sample.features.get(0), Some(10.0));
    assert_eq!(sample.features.get(17), Some(27.0));
    assert_eq!(sample.label, Label::Contaminated);
}

#[test]
fn test_missing_feature_column_is_schema_mismatch() {
    let content = header().replace("Turbidity,", "") + "\n";
    match parse(&content) {
        Err(PipelineError::SchemaMismatch(col)) => assert_eq!(col, "Turbidity"),
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_missing_target_column_is_schema_mismatch() {
    let content = FEATURE_LAYOUT.join(",") + "\n";
    assert!(matches!(parse(&content), Err(PipelineError::SchemaMismatch(c)) if c == "Target"));
}

#[test]
fn test_invalid_label_is_malformed() {
    let content = format!("{}\n{}", header(), row(0.0, 2));
    match parse(&content) {
        Err(PipelineError::MalformedRow { line, column, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(column, "Target");
        }
        other => panic!("expected MalformedRow, got {:?}", other),
    }
}

#[test]
fn test_header_only_is_insufficient() {
    assert!(matches!(parse(&header()), Err(PipelineError::InsufficientData(_))));
    assert!(matches!(parse(""), Err(PipelineError::SchemaMismatch(_))));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    match load(&path) {
        Err(PipelineError::DatasetNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected DatasetNotFound, got {:?}", other),
    }
}

#[test]
fn test_load_directory_is_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("water.csv");
    fs::create_dir_all(&path).unwrap();

    assert!(matches!(load(&path), Err(PipelineError::DatasetNotFound(p)) if p == path));
}

#[test]
fn test_load_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("water.csv");
    fs::write(&path, csv_with_rows(6)).unwrap();

    let dataset = load(&path).unwrap();
    assert_eq!(dataset.len(), 6);
}

#[test]
fn test_split_record_quotes() {
    let fields = split_record("\"Total Dissolved Solids\",\"a,b\", 3 ");
    assert_eq!(fields, vec!["Total Dissolved Solids", "a,b", "3"]);
}

#[test]
fn test_split_is_deterministic() {
    let dataset = parse(&csv_with_rows(50)).unwrap();
    let a = split(&dataset, 0.2, 42).unwrap();
    let b = split(&dataset, 0.2, 42).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_split_is_disjoint_cover() {
    let dataset = parse(&csv_with_rows(50)).unwrap();
    let s = split(&dataset, 0.2, 42).unwrap();

    assert_eq!(s.test.len(), 10);
    assert_eq!(s.train.len(), 40);

    let train: HashSet<usize> = s.train_indices.iter().copied().collect();
    let test: HashSet<usize> = s.test_indices.iter().copied().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), 50);
}

#[test]
fn test_split_rounds_test_size_up() {
    let dataset = parse(&csv_with_rows(11)).unwrap();
    let s = split(&dataset, 0.2, 42).unwrap();
    assert_eq!(s.test.len(), 3);
    assert_eq!(s.train.len(), 8);
}

#[test]
fn test_split_seed_changes_partition() {
    let dataset = parse(&csv_with_rows(50)).unwrap();
    let a = split(&dataset, 0.2, 42).unwrap();
    let b = split(&dataset, 0.2, 7).unwrap();
    assert_ne!(a.test_indices, b.test_indices);
}

#[test]
fn test_split_rejects_tiny_dataset() {
    let dataset = parse(&csv_with_rows(1)).unwrap();
    assert!(matches!(split(&dataset, 0.2, 42), Err(PipelineError::InsufficientData(_))));
    let dataset = parse(&csv_with_rows(10)).unwrap();
    assert!(split(&dataset, 1.0, 42).is_err());
}
