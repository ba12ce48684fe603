//! Assessment reports.
//!
//! A `Report` is an immutable snapshot of one pipeline run. Its fingerprint
//! covers every derived field but not the timestamp, so two runs over the same
//! inputs can be compared regardless of when they happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationResult;
use crate::disease::DiseasePrediction;
use crate::outbreak::OutbreakContext;
use crate::water::{WaterSample, WqiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertLevel {
    /// Closed-open bands over the combined risk score.
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::Critical
        } else if score >= 50.0 {
            Self::High
        } else if score >= 25.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::str::FromStr for AlertLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown alert level '{}'", other)),
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Component and combined risk scores, each within [0, 100].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskScores {
    pub disease_risk: f64,
    pub water_risk: f64,
    pub correlation_risk: f64,
    pub combined_risk: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub water: WaterSample,
    pub outbreak: OutbreakContext,
    pub wqi: WqiResult,
    pub disease: DiseasePrediction,
    pub correlation: CorrelationResult,
    pub risk_scores: RiskScores,
    pub alert_level: AlertLevel,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub fingerprint: String,
}

/// Everything in a report except the timestamp. Serialization order here is
/// the fingerprint's canonical form.
#[derive(Serialize)]
struct FingerprintView<'a> {
    water: &'a WaterSample,
    outbreak: &'a OutbreakContext,
    wqi: &'a WqiResult,
    disease: &'a DiseasePrediction,
    correlation: &'a CorrelationResult,
    risk_scores: &'a RiskScores,
    alert_level: &'a AlertLevel,
    recommendations: &'a [String],
}

impl Report {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        water: WaterSample,
        outbreak: OutbreakContext,
        wqi: WqiResult,
        disease: DiseasePrediction,
        correlation: CorrelationResult,
        risk_scores: RiskScores,
        alert_level: AlertLevel,
        recommendations: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut report = Self {
            water,
            outbreak,
            wqi,
            disease,
            correlation,
            risk_scores,
            alert_level,
            recommendations,
            timestamp,
            fingerprint: String::new(),
        };
        report.fingerprint = report.calculate_fingerprint();
        report
    }

    fn calculate_fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};

        let view = FingerprintView {
            water: &self.water,
            outbreak: &self.outbreak,
            wqi: &self.wqi,
            disease: &self.disease,
            correlation: &self.correlation,
            risk_scores: &self.risk_scores,
            alert_level: &self.alert_level,
            recommendations: &self.recommendations,
        };

        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_string(&view).unwrap_or_default());
        hex::encode(hasher.finalize())
    }

    pub fn verify_integrity(&self) -> bool {
        self.calculate_fingerprint() == self.fingerprint
    }

    /// Most urgent recommendation; the notification headline.
    pub fn headline(&self) -> Option<&str> {
        self.recommendations.first().map(String::as_str)
    }

    /// Whether the hosting system should dispatch an external alert.
    pub fn requires_notification(&self, threshold: AlertLevel) -> bool {
        self.alert_level >= threshold
    }
}

/// One forward month of a trend projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FutureReport {
    pub month_offset: u32,
    pub month: u8,
    pub seasonal_factor: f64,
    pub projected_cases: i64,
    pub seasonal_advisories: Vec<String>,
    pub report: Report,
}

/// Result of a full assessment: the current report plus any projections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub report: Report,
    pub projections: Vec<FutureReport>,
}

impl Assessment {
    /// Highest alert level across the current report and all projections.
    pub fn peak_alert_level(&self) -> AlertLevel {
        self.projections
            .iter()
            .map(|p| p.report.alert_level)
            .fold(self.report.alert_level, AlertLevel::max)
    }
}
