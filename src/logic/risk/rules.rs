//! Risk Rules
//!
//! Tier bounds and advisory text. No classification logic here.

use super::types::{Advisory, RiskTier};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// At or below this probability = LOW
pub const LOW_MAX: f64 = 0.33;

/// At or below this probability = MODERATE, above = HIGH
pub const MODERATE_MAX: f64 = 0.50;

// ============================================================================
// ADVISORIES
// ============================================================================

pub const LOW_ADVISORY: Advisory = Advisory {
    headline: None,
    lines: &[
        "A água apresenta leve ou nenhuma contaminação por óleo.",
        "Evite contato direto com a água se possível.",
        "Observe se há manchas pequenas ou odor leve.",
        "Em caso de dúvidas, entre em contato com a defesa civil",
    ],
};

pub const MODERATE_ADVISORY: Advisory = Advisory {
    headline: Some("CONTAMINAÇÃO MODERADA DETECTADA!"),
    lines: &[
        "Não entre em contato com a água.",
        "Notifique imediatamente as autoridades locais",
        "Evite o uso de sabão ou tentativas de limpeza caseira.",
        "Observe se animais estão sendo afetados",
    ],
};

pub const HIGH_ADVISORY: Advisory = Advisory {
    headline: Some("ALTA CONTAMINAÇÃO DETECTADA"),
    lines: &[
        "Risco grave à saúde e ao meio ambiente",
        "Afaste-se da área contaminada",
        "Evacue se necessário e chame o órgão ambiental competente",
        "Registre o local para ajudar nas investigações",
    ],
};

pub fn advisory_for(tier: RiskTier) -> Advisory {
    match tier {
        RiskTier::Low => LOW_ADVISORY,
        RiskTier::Moderate => MODERATE_ADVISORY,
        RiskTier::High => HIGH_ADVISORY,
    }
}
