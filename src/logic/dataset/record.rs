use serde::{Deserialize, Serialize};
use crate::logic::features::RawFeatureVector;

/// Binary water label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// 0 - acceptable water
    Good,
    /// 1 - contaminated
    Contaminated,
}

impl Label {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Label::Good),
            1 => Some(Label::Contaminated),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Label::Good => 0,
            Label::Contaminated => 1,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Label::Contaminated)
    }

    /// Name used in classification reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Label::Good => "Água Boa (0)",
            Label::Contaminated => "Água Ruim (1)",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: RawFeatureVector,
    pub label: Label,
}

/// Historical samples in file order. Read-only after load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    samples: Vec<LabeledSample>,
}

impl Dataset {
    pub fn new(samples: Vec<LabeledSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn positive_count(&self) -> usize {
        self.samples.iter().filter(|s| s.label.is_positive()).count()
    }
}
