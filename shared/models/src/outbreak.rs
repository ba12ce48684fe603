//! Outbreak context models: reported case counts, regions, and the seasonal
//! calendar used for banding and projection.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Outbreak observation submitted alongside a water sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct OutbreakContext {
    #[validate(range(min = 0, message = "Case count must not be negative"))]
    pub case_count: i64,
    #[validate(range(min = 1, max = 8, message = "Region code must be between 1 and 8"))]
    pub region_code: u8,
    #[validate(range(min = 1, max = 12, message = "Outbreak month must be between 1 and 12"))]
    pub outbreak_month: u8,
}

impl OutbreakContext {
    pub fn new(case_count: i64, region_code: u8, outbreak_month: u8) -> Self {
        Self {
            case_count,
            region_code,
            outbreak_month,
        }
    }

    pub fn region(&self) -> Option<Region> {
        Region::from_code(self.region_code)
    }

    pub fn season(&self) -> Season {
        Season::for_month(self.outbreak_month)
    }

    /// Case count as a non-negative float for scoring.
    pub fn cases(&self) -> f64 {
        self.case_count.max(0) as f64
    }
}

impl Default for OutbreakContext {
    fn default() -> Self {
        Self::new(0, 1, 7)
    }
}

/// North-eastern Indian states covered by the surveillance programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Assam,
    ArunachalPradesh,
    Manipur,
    Meghalaya,
    Mizoram,
    Nagaland,
    Tripura,
    Sikkim,
}

impl Region {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Assam),
            2 => Some(Self::ArunachalPradesh),
            3 => Some(Self::Manipur),
            4 => Some(Self::Meghalaya),
            5 => Some(Self::Mizoram),
            6 => Some(Self::Nagaland),
            7 => Some(Self::Tripura),
            8 => Some(Self::Sikkim),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Assam => 1,
            Self::ArunachalPradesh => 2,
            Self::Manipur => 3,
            Self::Meghalaya => 4,
            Self::Mizoram => 5,
            Self::Nagaland => 6,
            Self::Tripura => 7,
            Self::Sikkim => 8,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assam => write!(f, "Assam"),
            Self::ArunachalPradesh => write!(f, "Arunachal Pradesh"),
            Self::Manipur => write!(f, "Manipur"),
            Self::Meghalaya => write!(f, "Meghalaya"),
            Self::Mizoram => write!(f, "Mizoram"),
            Self::Nagaland => write!(f, "Nagaland"),
            Self::Tripura => write!(f, "Tripura"),
            Self::Sikkim => write!(f, "Sikkim"),
        }
    }
}

/// Seasonal grouping of calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// June through September.
    Monsoon,
    /// April, May, October, November.
    Transition,
    /// December through March.
    Dry,
}

impl Season {
    pub fn for_month(month: u8) -> Self {
        match month {
            6..=9 => Self::Monsoon,
            4 | 5 | 10 | 11 => Self::Transition,
            _ => Self::Dry,
        }
    }

    /// Numeric code fed to the case predictor.
    pub fn code(&self) -> u8 {
        match self {
            Self::Transition => 1,
            Self::Monsoon => 2,
            Self::Dry => 4,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monsoon => write!(f, "monsoon"),
            Self::Transition => write!(f, "pre/post-monsoon"),
            Self::Dry => write!(f, "dry"),
        }
    }
}

/// Fixed per-month case multiplier used for forward projection.
pub fn seasonal_factor(month: u8) -> f64 {
    match month {
        1 => 0.6,
        2 => 0.6,
        3 => 0.7,
        4 => 0.8,
        5 => 0.9,
        6 => 1.4,
        7 => 1.6,
        8 => 1.5,
        9 => 1.3,
        10 => 1.0,
        11 => 0.8,
        12 => 0.7,
        _ => 1.0,
    }
}

/// Calendar month `offset` months after `month`, wrapping across the year.
pub fn month_after(month: u8, offset: u32) -> u8 {
    let zero_based = (u32::from(month).saturating_sub(1) + offset) % 12;
    zero_based as u8 + 1
}

/// Case-count severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CaseBand {
    Low,
    Medium,
    High,
    Critical,
}

impl CaseBand {
    /// Bands by lower bound. Counts between the nominal ranges fall to the
    /// band below.
    pub fn for_cases(cases: f64) -> Self {
        if cases >= 500.0 {
            Self::Critical
        } else if cases >= 300.0 {
            Self::High
        } else if cases >= 100.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Case interval used for interpolation inside the band.
    pub fn case_interval(&self) -> (f64, f64) {
        match self {
            Self::Low => (0.0, 100.0),
            Self::Medium => (100.0, 300.0),
            Self::High => (300.0, 500.0),
            Self::Critical => (500.0, 1000.0),
        }
    }

    /// Disease probability interval the band maps onto.
    pub fn probability_interval(&self) -> (f64, f64) {
        match self {
            Self::Low => (5.0, 40.0),
            Self::Medium => (40.0, 65.0),
            Self::High => (65.0, 85.0),
            Self::Critical => (85.0, 100.0),
        }
    }
}

impl std::fmt::Display for CaseBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_wraps_across_year() {
        assert_eq!(month_after(11, 3), 2);
        assert_eq!(month_after(12, 1), 1);
        assert_eq!(month_after(1, 12), 1);
        assert_eq!(month_after(7, 0), 7);
    }

    #[test]
    fn test_seasons() {
        assert_eq!(Season::for_month(6), Season::Monsoon);
        assert_eq!(Season::for_month(9), Season::Monsoon);
        assert_eq!(Season::for_month(10), Season::Transition);
        assert_eq!(Season::for_month(1), Season::Dry);
        assert_eq!(Season::for_month(12), Season::Dry);
    }

    #[test]
    fn test_seasonal_factor_ranges() {
        for month in 6..=9 {
            let factor = seasonal_factor(month);
            assert!((1.3..=1.6).contains(&factor));
        }
        for month in [12, 1, 2, 3] {
            let factor = seasonal_factor(month);
            assert!((0.6..=0.9).contains(&factor));
        }
    }

    #[test]
    fn test_case_band_lower_bounds() {
        assert_eq!(CaseBand::for_cases(0.0), CaseBand::Low);
        assert_eq!(CaseBand::for_cases(99.0), CaseBand::Low);
        assert_eq!(CaseBand::for_cases(100.0), CaseBand::Medium);
        assert_eq!(CaseBand::for_cases(250.0), CaseBand::Medium);
        assert_eq!(CaseBand::for_cases(300.0), CaseBand::High);
        assert_eq!(CaseBand::for_cases(500.0), CaseBand::Critical);
    }

    #[test]
    fn test_region_codes_round_trip() {
        for code in 1..=8 {
            assert_eq!(Region::from_code(code).map(|r| r.code()), Some(code));
        }
        assert_eq!(Region::from_code(0), None);
        assert_eq!(Region::from_code(9), None);
    }
}
