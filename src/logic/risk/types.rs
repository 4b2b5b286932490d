//! Risk Types
//!
//! Data only. The mapping from probability to tier lives in `classifier`.

use serde::{Deserialize, Serialize};

// ============================================================================
// RISK TIER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Little or no oil contamination
    Low,
    Moderate,
    /// Evacuate, call the environmental agency
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Moderate => "MODERATE",
            RiskTier::High => "HIGH",
        }
    }

    /// ANSI color used by the terminal adapter
    pub fn ansi_color(&self) -> &'static str {
        match self {
            RiskTier::Low => "\x1b[1;32m",
            RiskTier::Moderate => "\x1b[1;33m",
            RiskTier::High => "\x1b[1;31m",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ADVISORY
// ============================================================================

/// Operator guidance for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    /// Highlighted first line, absent for LOW
    pub headline: Option<&'static str>,
    pub lines: &'static [&'static str],
}

impl Advisory {
    /// Headline (if any) followed by the guidance lines
    pub fn all_lines(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.headline.into_iter().chain(self.lines.iter().copied())
    }
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// Result of one operator assessment. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    /// P(Contaminated), clamped to [0, 1]
    pub probability: f64,
    pub tier: RiskTier,
    pub advisory: Advisory,
}

impl RiskAssessment {
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}
