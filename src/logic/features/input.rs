//! Operator Input - sanitize & range-check measurements
//!
//! Pure functions. The re-prompt loop lives in `api::menu`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::defaults::{default_template, operator_range};
use super::layout::feature_index;
use super::vector::FeatureVector;

/// Optional sign, digits, optional fractional part. No exponent, no separators.
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d+(?:\.\d+)?$").expect("numeric input pattern is valid")
});

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    InvalidFormat(String),
    OutOfRange {
        feature: String,
        value: f64,
        min: f64,
        max: f64,
    },
    UnknownFeature(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::InvalidFormat(_) => write!(f, "Entrada inválida: use apenas números"),
            InputError::OutOfRange { min, max, .. } => {
                write!(f, "Valor fora da faixa permitida! ({}-{})", min, max)
            }
            InputError::UnknownFeature(name) => write!(f, "Variável desconhecida: {}", name),
        }
    }
}

impl std::error::Error for InputError {}

// ============================================================================
// SANITIZE / VALIDATE
// ============================================================================

/// Convert raw operator text to a number
pub fn sanitize(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    if !NUMBER_PATTERN.is_match(trimmed) {
        return Err(InputError::InvalidFormat(raw.to_string()));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| InputError::InvalidFormat(raw.to_string()))
}

/// Inclusive on both ends
pub fn validate(value: f64, min: f64, max: f64) -> bool {
    min <= value && value <= max
}

/// Sanitize + validate one operator measurement
pub fn read_measurement(feature: &str, raw: &str) -> Result<f64, InputError> {
    let range = operator_range(feature)
        .ok_or_else(|| InputError::UnknownFeature(feature.to_string()))?;
    let value = sanitize(raw)?;

    if !validate(value, range.min, range.max) {
        return Err(InputError::OutOfRange {
            feature: feature.to_string(),
            value,
            min: range.min,
            max: range.max,
        });
    }

    Ok(value)
}

// ============================================================================
// OPERATOR INPUT
// ============================================================================

/// The three measurements collected from the operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorInput {
    pub ph: f64,
    pub turbidity: f64,
    pub conductivity: f64,
}

impl OperatorInput {
    /// Range-checked constructor
    pub fn new(ph: f64, turbidity: f64, conductivity: f64) -> Result<Self, InputError> {
        for (feature, value) in [("pH", ph), ("Turbidity", turbidity), ("Conductivity", conductivity)] {
            if let Some(range) = operator_range(feature) {
                if !validate(value, range.min, range.max) {
                    return Err(InputError::OutOfRange {
                        feature: feature.to_string(),
                        value,
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }
        Ok(Self { ph, turbidity, conductivity })
    }

    /// Complete to a full vector using DEFAULT_FEATURE_VALUES
    pub fn to_feature_vector(&self) -> FeatureVector {
        let mut values = default_template();
        for (name, value) in [("pH", self.ph), ("Turbidity", self.turbidity), ("Conductivity", self.conductivity)] {
            if let Some(i) = feature_index(name) {
                values[i] = value;
            }
        }
        FeatureVector::from_values(values)
    }
}
