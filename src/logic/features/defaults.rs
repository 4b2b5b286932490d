//! Operator Ranges & Default Feature Values
//!
//! Only pH, Turbidity and Conductivity come from the operator.
//! The other 15 features are always completed from `DEFAULT_FEATURE_VALUES`.
//! Constants only.

use super::layout::{feature_index, FEATURE_COUNT};

// ============================================================================
// OPERATOR-SUPPLIED FEATURES
// ============================================================================

/// Inclusive range accepted for an operator measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    pub feature: &'static str,
    pub min: f64,
    pub max: f64,
}

/// Prompt order: pH, Turbidity, Conductivity
pub const OPERATOR_RANGES: [ValidRange; 3] = [
    ValidRange { feature: "pH", min: 0.0, max: 14.0 },
    ValidRange { feature: "Turbidity", min: 0.0, max: 1000.0 },
    ValidRange { feature: "Conductivity", min: 0.0, max: 2000.0 },
];

pub fn operator_range(feature: &str) -> Option<ValidRange> {
    OPERATOR_RANGES.iter().find(|r| r.feature == feature).copied()
}

// ============================================================================
// DEFAULT FEATURE VALUES
// ============================================================================

/// Fixed values for every feature the operator does not supply
pub const DEFAULT_FEATURE_VALUES: [(&str, f64); 15] = [
    ("Iron", 0.1),
    ("Nitrate", 10.0),
    ("Chloride", 250.0),
    ("Lead", 0.01),
    ("Zinc", 5.0),
    ("Fluoride", 0.7),
    ("Copper", 1.0),
    ("Odor", 0.0),
    ("Sulfate", 250.0),
    ("Chlorine", 0.2),
    ("Manganese", 0.05),
    ("Total Dissolved Solids", 500.0),
    ("Water Temperature", 20.0),
    ("Air Temperature", 25.0),
    ("Day", 4.0),
];

pub fn default_value(feature: &str) -> Option<f64> {
    DEFAULT_FEATURE_VALUES
        .iter()
        .find(|(name, _)| *name == feature)
        .map(|(_, v)| *v)
}

/// Layout-ordered template with defaults filled and operator slots at 0.0
pub fn default_template() -> [f64; FEATURE_COUNT] {
    let mut values = [0.0; FEATURE_COUNT];
    for (name, value) in DEFAULT_FEATURE_VALUES {
        if let Some(i) = feature_index(name) {
            values[i] = value;
        }
    }
    values
}
