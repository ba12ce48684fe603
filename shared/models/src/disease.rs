//! Disease prediction models.

use serde::{Deserialize, Serialize};

use crate::outbreak::{CaseBand, Season};
use crate::water::{Deviation, WaterParameter};

/// Waterborne diseases the estimator can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disease {
    Cholera,
    Typhoid,
    #[serde(rename = "Acute Diarrheal Disease")]
    AcuteDiarrhealDisease,
    #[serde(rename = "Hepatitis A")]
    HepatitisA,
    Dysentery,
    #[serde(rename = "Food Poisoning")]
    FoodPoisoning,
    Gastroenteritis,
}

/// Clinical summary for a disease, phrased to read inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiseaseProfile {
    pub severity: &'static str,
    pub transmission: &'static str,
    pub symptoms: &'static str,
    pub treatment: &'static str,
}

impl Disease {
    pub fn profile(&self) -> DiseaseProfile {
        match self {
            Self::Cholera => DiseaseProfile {
                severity: "high",
                transmission: "contaminated water",
                symptoms: "severe diarrhea, vomiting, dehydration",
                treatment: "immediate rehydration, antibiotics",
            },
            Self::Typhoid => DiseaseProfile {
                severity: "high",
                transmission: "contaminated water/food",
                symptoms: "high fever, headache, abdominal pain",
                treatment: "antibiotics, supportive care",
            },
            Self::AcuteDiarrhealDisease => DiseaseProfile {
                severity: "moderate",
                transmission: "contaminated water/food",
                symptoms: "diarrhea, dehydration, fever",
                treatment: "ORS, antibiotics if severe",
            },
            Self::HepatitisA => DiseaseProfile {
                severity: "moderate",
                transmission: "contaminated water/food",
                symptoms: "jaundice, fatigue, nausea",
                treatment: "rest, supportive care",
            },
            Self::Dysentery => DiseaseProfile {
                severity: "moderate",
                transmission: "contaminated water/food",
                symptoms: "bloody diarrhea, fever, cramps",
                treatment: "antibiotics, fluids",
            },
            Self::FoodPoisoning => DiseaseProfile {
                severity: "low-moderate",
                transmission: "contaminated food",
                symptoms: "nausea, vomiting, diarrhea",
                treatment: "fluids, rest",
            },
            Self::Gastroenteritis => DiseaseProfile {
                severity: "low-moderate",
                transmission: "contaminated water/food",
                symptoms: "diarrhea, vomiting, stomach cramps",
                treatment: "fluids, rest, electrolytes",
            },
        }
    }

    /// Water-quality violations known to accompany this disease.
    pub fn water_signature(&self) -> &'static [(WaterParameter, Deviation)] {
        use Deviation::High;
        use WaterParameter::*;

        match self {
            Self::Cholera => &[(Ph, High), (FecalColiform, High), (TotalColiform, High)],
            Self::Typhoid => &[(NitrateN, High), (FecalColiform, High)],
            Self::AcuteDiarrhealDisease => &[(Bod, High), (FecalColiform, High), (TotalColiform, High)],
            Self::HepatitisA => &[(FecalColiform, High), (TotalColiform, High)],
            Self::Dysentery => &[(Bod, High), (FecalColiform, High)],
            Self::FoodPoisoning => &[(FecalColiform, High), (Temperature, High)],
            Self::Gastroenteritis => &[(Bod, High), (TotalColiform, High)],
        }
    }
}

impl std::fmt::Display for Disease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cholera => write!(f, "Cholera"),
            Self::Typhoid => write!(f, "Typhoid"),
            Self::AcuteDiarrhealDisease => write!(f, "Acute Diarrheal Disease"),
            Self::HepatitisA => write!(f, "Hepatitis A"),
            Self::Dysentery => write!(f, "Dysentery"),
            Self::FoodPoisoning => write!(f, "Food Poisoning"),
            Self::Gastroenteritis => write!(f, "Gastroenteritis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Parse a free-form confidence tag. Unrecognised tags read as `Medium`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// How the case estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionMethod {
    Predicted,
    RuleBased,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseasePrediction {
    pub predicted_cases: f64,
    pub confidence: Confidence,
    pub most_likely_disease: Disease,
    /// 0-100.
    pub disease_probability: f64,
    pub method: PredictionMethod,
    pub case_band: CaseBand,
    pub season: Season,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_serializes_by_display_name() {
        let json = serde_json::to_string(&Disease::HepatitisA).unwrap();
        assert_eq!(json, "\"Hepatitis A\"");
        let parsed: Disease = serde_json::from_str("\"Acute Diarrheal Disease\"").unwrap();
        assert_eq!(parsed, Disease::AcuteDiarrhealDisease);
    }

    #[test]
    fn test_confidence_tags() {
        assert_eq!(Confidence::from_tag("HIGH"), Confidence::High);
        assert_eq!(Confidence::from_tag(" low "), Confidence::Low);
        assert_eq!(Confidence::from_tag("unsure"), Confidence::Medium);
    }

    #[test]
    fn test_cholera_signature_includes_alkaline_ph() {
        assert!(Disease::Cholera
            .water_signature()
            .contains(&(WaterParameter::Ph, Deviation::High)));
    }
}
