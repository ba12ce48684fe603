//! Risk aggregation.

use hydrorisk_models::{AlertLevel, CorrelationResult, DiseasePrediction, RiskScores, WqiResult};
use hydrorisk_utils::{HydroRiskError, HydroRiskResult};

const DISEASE_WEIGHT: f64 = 0.4;
const WATER_WEIGHT: f64 = 0.3;
const CORRELATION_WEIGHT: f64 = 0.3;

/// Combine component scores into one risk score and alert level.
///
/// Component scores are already bounded; a non-finite one means an upstream
/// contract was broken and is reported as `Internal` rather than clamped away.
pub fn aggregate(
    wqi: &WqiResult,
    disease: &DiseasePrediction,
    correlation: &CorrelationResult,
) -> HydroRiskResult<(RiskScores, AlertLevel)> {
    let components = [
        ("disease_risk", disease.disease_probability),
        ("water_risk", wqi.score),
        ("correlation_risk", correlation.score),
    ];
    if let Some((name, value)) = components.iter().find(|(_, v)| !v.is_finite()) {
        return Err(HydroRiskError::internal(format!(
            "non-finite {} ({})",
            name, value
        )));
    }

    let combined = DISEASE_WEIGHT * disease.disease_probability
        + WATER_WEIGHT * wqi.score
        + CORRELATION_WEIGHT * correlation.score;
    let combined_risk = combined.clamp(0.0, 100.0);

    let scores = RiskScores {
        disease_risk: disease.disease_probability,
        water_risk: wqi.score,
        correlation_risk: correlation.score,
        combined_risk,
    };

    Ok((scores, AlertLevel::from_score(combined_risk)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{correlation, disease, wqi};
    use hydrorisk_models::{OutbreakContext, WaterSample};

    #[test]
    fn test_weighted_combination() {
        let sample = WaterSample {
            ph: 8.6,
            dissolved_oxygen: 3.0,
            bod: 5.0,
            nitrate_n: 12.0,
            fecal_coliform: 80.0,
            total_coliform: 450.0,
            temperature: 28.0,
        };
        let wqi = wqi::calculate(&sample);
        let prediction = disease::rule_based(&OutbreakContext::new(200, 2, 7));
        let corr = correlation::analyze(&wqi, &prediction);

        let (scores, level) = aggregate(&wqi, &prediction, &corr).unwrap();

        // 0.4 * 52.5 + 0.3 * 100 + 0.3 * 91.25
        assert!((scores.combined_risk - 78.375).abs() < 1e-9);
        assert_eq!(scores.water_risk, 100.0);
        assert_eq!(level, AlertLevel::Critical);
    }

    #[test]
    fn test_non_finite_component_is_internal_error() {
        let wqi = wqi::calculate(&WaterSample::default());
        let mut prediction = disease::rule_based(&OutbreakContext::new(10, 1, 1));
        let corr = correlation::analyze(&wqi, &prediction);
        prediction.disease_probability = f64::NAN;

        let error = aggregate(&wqi, &prediction, &corr).unwrap_err();
        assert_eq!(error.error_code(), "INTERNAL_ERROR");
    }
}
