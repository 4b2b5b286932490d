//! Risk Module
//!
//! Maps the contamination probability to LOW / MODERATE / HIGH and the
//! advisory shown to the operator.
//!
//! ## Structure
//! - `types`: RiskTier, Advisory, RiskAssessment
//! - `rules`: tier bounds and advisory text
//! - `classifier`: probability -> RiskAssessment
//!
//! ## Usage
//! ```ignore
//! use crate::logic::risk::{classify, RiskTier};
//!
//! let assessment = classify(0.42);
//! assert_eq!(assessment.tier, RiskTier::Moderate);
//! ```

pub mod types;
pub mod rules;
pub mod classifier;

pub use types::{Advisory, RiskAssessment, RiskTier};
pub use rules::{LOW_MAX, MODERATE_MAX};
pub use classifier::classify;
