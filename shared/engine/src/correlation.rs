//! Correlation between water quality and disease risk.

use hydrorisk_models::{
    CaseBand, CorrelationResult, CorrelationStrength, DiseasePrediction, Season, Violation,
    WqiResult,
};

const MATCH_BONUS: f64 = 15.0;

pub fn analyze(wqi: &WqiResult, disease: &DiseasePrediction) -> CorrelationResult {
    let signature = disease.most_likely_disease.water_signature();
    let matches = |v: &Violation| signature.contains(&(v.parameter, v.direction));

    let matched: Vec<&Violation> = wqi.violations.iter().filter(|v| matches(v)).collect();
    let disease_water_match = !matched.is_empty();

    let bonus = if disease_water_match { MATCH_BONUS } else { 0.0 };
    let score = (0.5 * wqi.score + 0.5 * disease.disease_probability + bonus).min(100.0);
    let strength = CorrelationStrength::from_score(score);

    let mut factors: Vec<String> = matched
        .iter()
        .map(|v| format!("{} matches {} profile", v.message, disease.most_likely_disease))
        .collect();

    factors.extend(
        wqi.critical_violations()
            .filter(|v| !matches(v))
            .map(|v| format!("Critical violation: {}", v.message)),
    );

    if disease.season == Season::Monsoon {
        factors.push("Monsoon season amplifies waterborne transmission".to_string());
    }

    if disease.case_band >= CaseBand::High {
        factors.push(format!(
            "{} case load ({:.0} cases) indicates active transmission",
            disease.case_band, disease.predicted_cases
        ));
    }

    CorrelationResult {
        score,
        strength,
        factors,
        disease_water_match,
        critical_intervention_needed: strength.is_strong() && disease_water_match,
    }
}
