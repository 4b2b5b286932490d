//! Feature Vector - Core data structure for model input
//!
//! `FeatureVector` is always complete (18 values in layout order).
//! `RawFeatureVector` is what the dataset gives us: any slot may be missing.
//! Only the imputer turns one into the other.

use serde::{Deserialize, Serialize};
use super::layout::{feature_index, FEATURE_COUNT};

// ============================================================================
// COMPLETE FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set feature by name, returns false for unknown names
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        match feature_index(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// RAW FEATURE VECTOR (may contain missing values)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFeatureVector {
    pub values: [Option<f64>; FEATURE_COUNT],
}

impl RawFeatureVector {
    pub fn new(values: [Option<f64>; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

impl From<FeatureVector> for RawFeatureVector {
    fn from(v: FeatureVector) -> Self {
        let mut values = [None; FEATURE_COUNT];
        for (slot, x) in values.iter_mut().zip(v.values) {
            *slot = Some(x);
        }
        Self { values }
    }
}
