//! Risk Classifier
//!
//! Input: contamination probability from the forest
//! Output: RiskAssessment (tier + advisory)
//!
//! Pure and deterministic. Bounds are inclusive on the lower tiers.

use super::rules::{advisory_for, LOW_MAX, MODERATE_MAX};
use super::types::{RiskAssessment, RiskTier};

pub fn classify(probability: f64) -> RiskAssessment {
    // NaN never comes out of the forest, treat it as no evidence
    let probability = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
    let tier = tier_for(probability);

    RiskAssessment {
        probability,
        tier,
        advisory: advisory_for(tier),
    }
}

pub fn tier_for(probability: f64) -> RiskTier {
    if probability <= LOW_MAX {
        RiskTier::Low
    } else if probability <= MODERATE_MAX {
        RiskTier::Moderate
    } else {
        RiskTier::High
    }
}
