//! Features Module - Schema & Operator Input
//!
//! ## Structure
//! - `layout`: feature names/order, version, layout hash
//! - `defaults`: operator ranges + DEFAULT_FEATURE_VALUES
//! - `vector`: FeatureVector / RawFeatureVector
//! - `input`: sanitize/validate operator measurements

pub mod layout;
pub mod defaults;
pub mod vector;
pub mod input;

pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo};
pub use defaults::{OPERATOR_RANGES, DEFAULT_FEATURE_VALUES, ValidRange};
pub use vector::{FeatureVector, RawFeatureVector};
pub use input::{sanitize, validate, read_measurement, InputError, OperatorInput};
