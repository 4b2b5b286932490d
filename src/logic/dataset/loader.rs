//! Dataset Loader - labeled CSV ingest
//!
//! Header must contain every FEATURE_LAYOUT column plus `Target`.
//! Column order in the file is free, extra columns are ignored.
//! Empty / NaN / NA / null cells become missing values.

use std::fs;
use std::path::Path;

use crate::constants::TARGET_COLUMN;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{RawFeatureVector, FEATURE_COUNT, FEATURE_LAYOUT};
use super::record::{Dataset, Label, LabeledSample};

const MISSING_MARKERS: &[&str] = &["", "nan", "na", "null", "none"];

/// Load the historical dataset
pub fn load(path: &Path) -> PipelineResult<Dataset> {
    if !path.is_file() {
        log::warn!("Dataset not found at {}", path.display());
        return Err(PipelineError::DatasetNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let dataset = parse(&content)?;

    log::info!(
        "Loaded {} samples ({} contaminated) from {}",
        dataset.len(),
        dataset.positive_count(),
        path.display()
    );

    Ok(dataset)
}

/// Parse CSV text into a Dataset
pub fn parse(content: &str) -> PipelineResult<Dataset> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_start_matches('\u{feff}')))
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| PipelineError::SchemaMismatch("header".to_string()))?;
    let header = split_record(header_line);

    let feature_columns = resolve_columns(&header, FEATURE_LAYOUT)?;
    let target_column = column_position(&header, TARGET_COLUMN)?;

    let mut samples = Vec::new();
    for (line_no, line) in lines {
        let fields = split_record(line);

        let mut values = [None; FEATURE_COUNT];
        for (slot, (&col, name)) in values.iter_mut().zip(feature_columns.iter().zip(FEATURE_LAYOUT)) {
            *slot = parse_cell(fields.get(col).map(String::as_str).unwrap_or(""))
                .map_err(|reason| PipelineError::MalformedRow {
                    line: line_no,
                    column: name.to_string(),
                    reason,
                })?;
        }

        let label = parse_label(fields.get(target_column).map(String::as_str).unwrap_or(""))
            .map_err(|reason| PipelineError::MalformedRow {
                line: line_no,
                column: TARGET_COLUMN.to_string(),
                reason,
            })?;

        samples.push(LabeledSample {
            features: RawFeatureVector::new(values),
            label,
        });
    }

    if samples.is_empty() {
        return Err(PipelineError::InsufficientData("dataset has no rows".to_string()));
    }

    Ok(Dataset::new(samples))
}

// ============================================================================
// CSV HELPERS (shared with the artifact store)
// ============================================================================

/// Split one CSV record, honouring double-quoted fields
pub(crate) fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);

    fields.into_iter().map(|f| f.trim().to_string()).collect()
}

/// Position of each required column in the header
pub(crate) fn resolve_columns(header: &[String], names: &[&str]) -> PipelineResult<Vec<usize>> {
    names.iter().map(|name| column_position(header, name)).collect()
}

pub(crate) fn column_position(header: &[String], name: &str) -> PipelineResult<usize> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| PipelineError::SchemaMismatch(name.to_string()))
}

/// None for missing markers, Err for non-numeric text
pub(crate) fn parse_cell(cell: &str) -> Result<Option<f64>, String> {
    let cell = cell.trim();
    if MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(format!("non-finite value '{}'", cell)),
        Err(_) => Err(format!("not a number: '{}'", cell)),
    }
}

pub(crate) fn parse_label(cell: &str) -> Result<Label, String> {
    let value = match parse_cell(cell)? {
        Some(v) => v,
        None => return Err("missing label".to_string()),
    };
    if value == 0.0 {
        Ok(Label::Good)
    } else if value == 1.0 {
        Ok(Label::Contaminated)
    } else {
        Err(format!("label must be 0 or 1, got {}", cell))
    }
}
