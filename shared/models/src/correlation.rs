//! Disease/water-quality correlation models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    /// Weak < 30 <= Moderate < 60 <= Strong <= 80 < VeryStrong.
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Self::VeryStrong
        } else if score >= 60.0 {
            Self::Strong
        } else if score >= 30.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn is_strong(&self) -> bool {
        matches!(self, Self::Strong | Self::VeryStrong)
    }
}

impl std::fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weak => write!(f, "Weak"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Strong => write!(f, "Strong"),
            Self::VeryStrong => write!(f, "Very Strong"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationResult {
    /// 0-100.
    pub score: f64,
    pub strength: CorrelationStrength,
    pub factors: Vec<String>,
    pub disease_water_match: bool,
    pub critical_intervention_needed: bool,
}
