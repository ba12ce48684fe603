//! Future trend projection.
//!
//! Each forward month is an independent rule-based assessment with the case
//! count scaled by the target month's seasonal factor. Months run in parallel
//! on the rayon pool and come back ordered by offset.

use chrono::{DateTime, Utc};
use hydrorisk_models::{
    month_after, seasonal_factor, AlertLevel, FutureReport, OutbreakContext, Season, WaterSample,
};
use hydrorisk_utils::{
    validate_outbreak, validate_water_overrides, validate_water_sample, HydroRiskResult,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use crate::disease;
use crate::pipeline::compose_report;

const MAX_ADVISORIES: usize = 5;

#[derive(Debug, Clone)]
pub struct ProjectionRequest {
    pub water: WaterSample,
    pub outbreak: OutbreakContext,
    pub months_ahead: u32,
    /// Expected water readings for specific offsets; other months reuse `water`.
    pub water_overrides: BTreeMap<u32, WaterSample>,
    pub timestamp: DateTime<Utc>,
}

impl ProjectionRequest {
    pub fn new(
        water: WaterSample,
        outbreak: OutbreakContext,
        months_ahead: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            water,
            outbreak,
            months_ahead,
            water_overrides: BTreeMap::new(),
            timestamp,
        }
    }

    pub fn with_override(mut self, month_offset: u32, water: WaterSample) -> Self {
        self.water_overrides.insert(month_offset, water);
        self
    }
}

/// Validate the request, then assess each forward month.
pub fn project(request: &ProjectionRequest) -> HydroRiskResult<Vec<FutureReport>> {
    validate_water_sample(&request.water)?;
    validate_outbreak(&request.outbreak)?;
    validate_water_overrides(&request.water_overrides, request.months_ahead)?;

    (1..=request.months_ahead)
        .into_par_iter()
        .map(|offset| project_month(request, offset))
        .collect()
}

/// Projected case count for a target month.
pub fn projected_cases(base_cases: i64, month: u8) -> i64 {
    ((base_cases as f64 * seasonal_factor(month)).round() as i64).max(1)
}

fn project_month(request: &ProjectionRequest, offset: u32) -> HydroRiskResult<FutureReport> {
    let month = month_after(request.outbreak.outbreak_month, offset);
    let factor = seasonal_factor(month);
    let cases = projected_cases(request.outbreak.case_count, month);

    let outbreak = OutbreakContext::new(cases, request.outbreak.region_code, month);
    let water = request
        .water_overrides
        .get(&offset)
        .copied()
        .unwrap_or(request.water);

    let prediction = disease::rule_based(&outbreak);
    let report = compose_report(water, outbreak, prediction, request.timestamp)?;

    debug!(
        month_offset = offset,
        month,
        projected_cases = cases,
        alert_level = %report.alert_level,
        "Projected month"
    );

    Ok(FutureReport {
        month_offset: offset,
        month,
        seasonal_factor: factor,
        projected_cases: cases,
        seasonal_advisories: seasonal_advisories(month, report.alert_level),
        report,
    })
}

pub fn seasonal_advisories(month: u8, level: AlertLevel) -> Vec<String> {
    let seasonal: &[&str] = match (Season::for_month(month), month) {
        (Season::Monsoon, _) => &[
            "Prepare for a monsoon-related disease surge",
            "Ensure water treatment capacity for increased demand",
            "Stock additional medical supplies for waterborne diseases",
        ],
        (_, 4) | (_, 5) => &[
            "Conduct preventive maintenance on water systems",
            "Train health workers for the upcoming monsoon season",
            "Establish early warning systems",
        ],
        _ => &["Conduct routine surveillance", "Monitor water quality trends"],
    };

    let escalation: &[&str] = match level {
        AlertLevel::Critical => &[
            "Prepare emergency response protocols",
            "Plan hospital capacity expansion",
            "Launch preemptive public health campaigns",
        ],
        AlertLevel::High => &[
            "Increase surveillance frequency",
            "Ensure adequate medicine stockpiles",
        ],
        AlertLevel::Medium | AlertLevel::Low => &[],
    };

    seasonal
        .iter()
        .chain(escalation)
        .take(MAX_ADVISORIES)
        .map(|s| s.to_string())
        .collect()
}
