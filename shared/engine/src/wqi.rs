//! Water Quality Index
//!
//! Weighted normalized deviation of each reading from its reference band,
//! plus the violations and combination risk factors that explain the score.

use hydrorisk_models::{WaterParameter, WaterSample, Violation, WqiCategory, WqiResult};

/// Score a sample. Pure; inputs are assumed validated.
pub fn calculate(sample: &WaterSample) -> WqiResult {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    let mut violations = Vec::new();

    for parameter in WaterParameter::ALL {
        let band = parameter.band();
        let value = sample.value(parameter);

        weighted += band.weight * band.normalized_deviation(value);
        total_weight += band.weight;

        if let Some(direction) = band.violation(value) {
            violations.push(Violation::new(parameter, value, direction, band.is_critical(value)));
        }
    }

    let raw_score = 100.0 * weighted / total_weight;
    let score = raw_score.clamp(0.0, 100.0);

    WqiResult {
        score,
        raw_score,
        category: WqiCategory::from_score(score),
        risk_factors: combination_factors(&violations),
        violations,
    }
}

fn combination_factors(violations: &[Violation]) -> Vec<String> {
    use WaterParameter::*;

    let violated = |p: WaterParameter| violations.iter().any(|v| v.parameter == p);

    let rules: [(bool, &str); 5] = [
        (
            violated(FecalColiform) && violated(Bod),
            "Fecal contamination with high organic load",
        ),
        (
            violated(FecalColiform) && violated(TotalColiform),
            "Widespread coliform contamination",
        ),
        (
            violated(DissolvedOxygen) && violated(Bod),
            "Oxygen depletion driven by organic pollution",
        ),
        (
            violated(NitrateN) && violated(FecalColiform),
            "Sewage intrusion (nitrate with fecal indicators)",
        ),
        (
            violated(Ph) && violated(Temperature),
            "Thermal and pH stress favouring pathogen survival",
        ),
    ];

    let mut factors: Vec<String> = rules
        .iter()
        .filter(|(holds, _)| *holds)
        .map(|(_, factor)| factor.to_string())
        .collect();

    let critical: Vec<&str> = violations
        .iter()
        .filter(|v| v.critical)
        .map(|v| v.parameter.label())
        .collect();
    if !critical.is_empty() {
        factors.push(format!("Critical exceedance: {}", critical.join(", ")));
    }

    factors
}
