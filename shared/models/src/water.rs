//! Water quality domain models.
//!
//! Raw chemical/biological readings, the reference bands they are judged
//! against, and the derived Water Quality Index result.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single water sample. Units: pH dimensionless, dissolved oxygen / BOD /
/// nitrate in mg/L, coliforms in CFU/100 mL, temperature in °C.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq)]
pub struct WaterSample {
    #[validate(range(min = 0.0, max = 14.0, message = "pH must be between 0 and 14"))]
    pub ph: f64,
    #[validate(range(min = 0.0, message = "Dissolved oxygen must not be negative"))]
    pub dissolved_oxygen: f64,
    #[validate(range(min = 0.0, message = "BOD must not be negative"))]
    pub bod: f64,
    #[validate(range(min = 0.0, message = "Nitrate-N must not be negative"))]
    pub nitrate_n: f64,
    #[validate(range(min = 0.0, message = "Fecal coliform count must not be negative"))]
    pub fecal_coliform: f64,
    #[validate(range(min = 0.0, message = "Total coliform count must not be negative"))]
    pub total_coliform: f64,
    #[validate(range(min = 0.0, message = "Temperature must not be negative"))]
    pub temperature: f64,
}

impl WaterSample {
    /// Reading for one parameter.
    pub fn value(&self, parameter: WaterParameter) -> f64 {
        match parameter {
            WaterParameter::Ph => self.ph,
            WaterParameter::DissolvedOxygen => self.dissolved_oxygen,
            WaterParameter::Bod => self.bod,
            WaterParameter::NitrateN => self.nitrate_n,
            WaterParameter::FecalColiform => self.fecal_coliform,
            WaterParameter::TotalColiform => self.total_coliform,
            WaterParameter::Temperature => self.temperature,
        }
    }

    /// Copy of this sample with one parameter replaced.
    pub fn with_value(mut self, parameter: WaterParameter, value: f64) -> Self {
        match parameter {
            WaterParameter::Ph => self.ph = value,
            WaterParameter::DissolvedOxygen => self.dissolved_oxygen = value,
            WaterParameter::Bod => self.bod = value,
            WaterParameter::NitrateN => self.nitrate_n = value,
            WaterParameter::FecalColiform => self.fecal_coliform = value,
            WaterParameter::TotalColiform => self.total_coliform = value,
            WaterParameter::Temperature => self.temperature = value,
        }
        self
    }
}

impl Default for WaterSample {
    /// Defaults used by the quick-analysis entry points.
    fn default() -> Self {
        Self {
            ph: 7.0,
            dissolved_oxygen: 5.0,
            bod: 3.0,
            nitrate_n: 5.0,
            fecal_coliform: 20.0,
            total_coliform: 100.0,
            temperature: 25.0,
        }
    }
}

/// Measured parameters. Declaration order is the canonical ordering for
/// every list the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterParameter {
    Ph,
    DissolvedOxygen,
    Bod,
    NitrateN,
    FecalColiform,
    TotalColiform,
    Temperature,
}

impl WaterParameter {
    pub const ALL: [WaterParameter; 7] = [
        WaterParameter::Ph,
        WaterParameter::DissolvedOxygen,
        WaterParameter::Bod,
        WaterParameter::NitrateN,
        WaterParameter::FecalColiform,
        WaterParameter::TotalColiform,
        WaterParameter::Temperature,
    ];

    /// Field name as it appears in inputs and validation errors.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Ph => "ph",
            Self::DissolvedOxygen => "dissolved_oxygen",
            Self::Bod => "bod",
            Self::NitrateN => "nitrate_n",
            Self::FecalColiform => "fecal_coliform",
            Self::TotalColiform => "total_coliform",
            Self::Temperature => "temperature",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ph => "pH",
            Self::DissolvedOxygen => "dissolved oxygen",
            Self::Bod => "BOD",
            Self::NitrateN => "nitrate-N",
            Self::FecalColiform => "fecal coliform",
            Self::TotalColiform => "total coliform",
            Self::Temperature => "temperature",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Ph => "",
            Self::DissolvedOxygen | Self::Bod | Self::NitrateN => " mg/L",
            Self::FecalColiform | Self::TotalColiform => " CFU/100mL",
            Self::Temperature => "°C",
        }
    }

    /// WHO/BIS-aligned reference band for this parameter.
    pub fn band(&self) -> ReferenceBand {
        match self {
            Self::Ph => ReferenceBand {
                ideal: IdealRange::Between(6.5, 8.5),
                critical: CriticalLimits { below: Some(6.0), above: Some(9.0) },
                weight: 0.12,
            },
            Self::DissolvedOxygen => ReferenceBand {
                ideal: IdealRange::Above(5.0),
                critical: CriticalLimits { below: Some(2.0), above: None },
                weight: 0.15,
            },
            Self::Bod => ReferenceBand {
                ideal: IdealRange::Below(3.0),
                critical: CriticalLimits { below: None, above: Some(10.0) },
                weight: 0.18,
            },
            Self::NitrateN => ReferenceBand {
                ideal: IdealRange::Below(10.0),
                critical: CriticalLimits { below: None, above: Some(20.0) },
                weight: 0.12,
            },
            Self::FecalColiform => ReferenceBand {
                ideal: IdealRange::Below(1.0),
                critical: CriticalLimits { below: None, above: Some(200.0) },
                weight: 0.20,
            },
            Self::TotalColiform => ReferenceBand {
                ideal: IdealRange::Below(50.0),
                critical: CriticalLimits { below: None, above: Some(1000.0) },
                weight: 0.18,
            },
            Self::Temperature => ReferenceBand {
                ideal: IdealRange::Between(20.0, 30.0),
                critical: CriticalLimits { below: None, above: None },
                weight: 0.05,
            },
        }
    }
}

impl std::fmt::Display for WaterParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Ideal range for a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdealRange {
    /// Inclusive two-sided band.
    Between(f64, f64),
    /// Strictly above the limit is ideal; at or below violates.
    Above(f64),
    /// Strictly below the limit is ideal; at or above violates.
    Below(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalLimits {
    pub below: Option<f64>,
    pub above: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceBand {
    pub ideal: IdealRange,
    pub critical: CriticalLimits,
    /// Importance weight in the index. Coliforms and BOD dominate.
    pub weight: f64,
}

impl ReferenceBand {
    /// Direction of the violation, if the reading crosses the trigger.
    pub fn violation(&self, value: f64) -> Option<Deviation> {
        match self.ideal {
            IdealRange::Between(low, _) if value < low => Some(Deviation::Low),
            IdealRange::Between(_, high) if value > high => Some(Deviation::High),
            IdealRange::Between(..) => None,
            IdealRange::Above(limit) if value <= limit => Some(Deviation::Low),
            IdealRange::Above(_) => None,
            IdealRange::Below(limit) if value >= limit => Some(Deviation::High),
            IdealRange::Below(_) => None,
        }
    }

    pub fn is_critical(&self, value: f64) -> bool {
        self.critical.below.is_some_and(|limit| value < limit)
            || self.critical.above.is_some_and(|limit| value > limit)
    }

    /// Distance outside the ideal band in units of the band half-width.
    /// Zero anywhere inside the band. A NaN reading yields NaN.
    pub fn normalized_deviation(&self, value: f64) -> f64 {
        let (midpoint, half_width) = match self.ideal {
            IdealRange::Between(low, high) => ((low + high) / 2.0, (high - low) / 2.0),
            IdealRange::Below(limit) => (limit / 2.0, limit / 2.0),
            IdealRange::Above(limit) => {
                // Unbounded above: only the shortfall counts.
                let half_width = limit / 2.0;
                return outside((limit - value) / half_width);
            }
        };
        outside(((value - midpoint).abs() - half_width) / half_width)
    }
}

/// Negative distances are inside the band. `f64::max` would turn NaN into 0.
fn outside(distance: f64) -> f64 {
    if distance < 0.0 {
        0.0
    } else {
        distance
    }
}

/// Which side of the ideal band a reading fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Deviation {
    Low,
    High,
}

/// A parameter that crossed its violation trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    pub parameter: WaterParameter,
    pub observed: f64,
    pub direction: Deviation,
    pub critical: bool,
    pub message: String,
}

impl Violation {
    pub fn new(parameter: WaterParameter, observed: f64, direction: Deviation, critical: bool) -> Self {
        let message = match parameter {
            WaterParameter::Ph => format!("pH out of range ({:.1})", observed),
            WaterParameter::DissolvedOxygen => {
                format!("Low dissolved oxygen ({:.1} mg/L)", observed)
            }
            WaterParameter::Temperature => format!("Temperature stress ({:.1}°C)", observed),
            other => format!("High {} ({:.1}{})", other.label(), observed, other.unit()),
        };
        Self {
            parameter,
            observed,
            direction,
            critical,
            message,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Qualitative WQI category. Higher index means worse water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WqiCategory {
    Excellent,
    Good,
    Poor,
    VeryPoor,
}

impl WqiCategory {
    /// Closed-open bands: a score of exactly 25 is `Good`.
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            Self::Excellent
        } else if score < 50.0 {
            Self::Good
        } else if score < 75.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }
}

impl std::fmt::Display for WqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Poor => write!(f, "Poor"),
            Self::VeryPoor => write!(f, "Very Poor"),
        }
    }
}

/// Water Quality Index computed for one sample.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WqiResult {
    /// Index clipped to [0, 100].
    pub score: f64,
    /// Unclipped index.
    pub raw_score: f64,
    pub category: WqiCategory,
    pub risk_factors: Vec<String>,
    pub violations: Vec<Violation>,
}

impl WqiResult {
    pub fn critical_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.critical)
    }
}
