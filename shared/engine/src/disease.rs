//! Disease risk estimation.
//!
//! One decision table serves every path: a usable oracle estimate only
//! replaces the case count (and confidence) fed into it.

use hydrorisk_models::{
    CaseBand, Confidence, Disease, DiseasePrediction, OutbreakContext, PredictionMethod, Season,
};

use crate::predictor::CaseEstimate;

/// Estimate disease risk, adopting the oracle's estimate when it is usable.
pub fn estimate(outbreak: &OutbreakContext, oracle: Option<&CaseEstimate>) -> DiseasePrediction {
    match oracle.filter(|e| e.is_usable()) {
        Some(estimate) => {
            let mut prediction = from_cases(estimate.predicted_cases, outbreak.season());
            prediction.confidence = Confidence::from_tag(&estimate.confidence);
            prediction.method = PredictionMethod::Predicted;
            prediction
        }
        None => rule_based(outbreak),
    }
}

/// Rule-based estimate from the reported case count.
pub fn rule_based(outbreak: &OutbreakContext) -> DiseasePrediction {
    from_cases(outbreak.cases(), outbreak.season())
}

fn from_cases(cases: f64, season: Season) -> DiseasePrediction {
    let case_band = CaseBand::for_cases(cases);

    DiseasePrediction {
        predicted_cases: cases,
        confidence: band_confidence(case_band),
        most_likely_disease: most_likely_disease(season, case_band, cases),
        disease_probability: disease_probability(cases),
        method: PredictionMethod::RuleBased,
        case_band,
        season,
    }
}

/// Position of `cases` inside its band, mapped onto the band's probability
/// range. Continuous and non-decreasing.
pub fn disease_probability(cases: f64) -> f64 {
    let band = CaseBand::for_cases(cases);
    let (case_low, case_high) = band.case_interval();
    let (prob_low, prob_high) = band.probability_interval();

    let position = ((cases - case_low) / (case_high - case_low)).clamp(0.0, 1.0);
    prob_low + position * (prob_high - prob_low)
}

pub fn most_likely_disease(season: Season, band: CaseBand, cases: f64) -> Disease {
    use CaseBand::*;
    use Disease::*;

    match (season, band) {
        (Season::Monsoon, Low) if cases <= 50.0 => HepatitisA,
        (Season::Monsoon, Low) => Dysentery,
        (Season::Monsoon, _) => Cholera,

        (Season::Transition, Low) if cases <= 50.0 => HepatitisA,
        (Season::Transition, Low) | (Season::Transition, Medium) => Typhoid,
        (Season::Transition, High) => AcuteDiarrhealDisease,
        (Season::Transition, Critical) => Cholera,

        (Season::Dry, Low) if cases <= 50.0 => FoodPoisoning,
        (Season::Dry, Low) => HepatitisA,
        (Season::Dry, Medium) => Gastroenteritis,
        (Season::Dry, High) | (Season::Dry, Critical) => AcuteDiarrhealDisease,
    }
}

fn band_confidence(band: CaseBand) -> Confidence {
    match band {
        CaseBand::Critical | CaseBand::High => Confidence::High,
        CaseBand::Medium => Confidence::Medium,
        CaseBand::Low => Confidence::Low,
    }
}
