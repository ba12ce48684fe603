//! Recommendation generation.
//!
//! A fixed priority table, most urgent first. The first entry doubles as the
//! notification headline, so ordering is part of the contract.

use hydrorisk_models::{
    AlertLevel, CorrelationResult, Disease, DiseasePrediction, WaterParameter, WqiResult,
};

pub struct RecommendationInput<'a> {
    pub wqi: &'a WqiResult,
    pub disease: &'a DiseasePrediction,
    pub correlation: &'a CorrelationResult,
    pub alert_level: AlertLevel,
}

const CRITICAL_INTERVENTION: [&str; 3] = [
    "URGENT: Implement immediate water treatment and health interventions",
    "Alert district health authorities and the water board immediately",
    "Restrict use of affected water sources until treatment is confirmed",
];

pub fn generate(input: &RecommendationInput<'_>) -> Vec<String> {
    let mut recommendations = Recommendations::default();

    if input.correlation.critical_intervention_needed {
        recommendations.extend(CRITICAL_INTERVENTION);
    }

    recommendations.extend(alert_actions(input.alert_level).iter().copied());

    if input.alert_level >= AlertLevel::Medium || input.correlation.disease_water_match {
        let disease = input.disease.most_likely_disease;
        recommendations.extend(disease_actions(disease).iter().copied());
        recommendations.push(&clinical_briefing(disease));
    }

    for violation in &input.wqi.violations {
        recommendations.push(remediation(violation.parameter));
    }

    recommendations.extend(monitoring_cadence(input.correlation.strength.is_strong()).iter().copied());

    recommendations.into_vec()
}

fn alert_actions(level: AlertLevel) -> &'static [&'static str] {
    match level {
        AlertLevel::Critical => &[
            "Activate emergency response protocols",
            "Mobilize medical teams and expand hospital capacity",
        ],
        AlertLevel::High => &[
            "Increase disease surveillance frequency",
            "Ensure adequate medicine stockpiles",
        ],
        AlertLevel::Medium => &[
            "Increase water quality and case monitoring",
            "Issue preventive public health messaging",
        ],
        AlertLevel::Low => &["Continue routine water quality and disease monitoring"],
    }
}

fn disease_actions(disease: Disease) -> &'static [&'static str] {
    match disease {
        Disease::Cholera => &[
            "Chlorinate all drinking water sources immediately",
            "Prepare ORS and IV fluid supplies",
            "Test water sources for Vibrio cholerae",
        ],
        Disease::Typhoid => &[
            "Consider mass vaccination in high-risk areas",
            "Test water for Salmonella Typhi contamination",
            "Prepare antibiotic treatment protocols",
        ],
        Disease::AcuteDiarrhealDisease | Disease::Dysentery => &[
            "Improve sanitation and hygiene facilities",
            "Ensure zinc and ORS availability",
            "Run community education on handwashing",
        ],
        Disease::HepatitisA => &[
            "Offer hepatitis A vaccination to exposed households",
            "Advise boiling drinking water",
        ],
        Disease::FoodPoisoning => &[
            "Inspect food handling and storage practices",
            "Trace and withdraw suspected food sources",
        ],
        Disease::Gastroenteritis => &[
            "Ensure ORS availability at health centres",
            "Promote safe food and water hygiene",
        ],
    }
}

/// Case-management line drawn from the disease profile.
fn clinical_briefing(disease: Disease) -> String {
    let profile = disease.profile();
    format!(
        "Brief health centres on {} ({} severity, spread by {}): watch for {}; treat with {}",
        disease, profile.severity, profile.transmission, profile.symptoms, profile.treatment
    )
}

fn remediation(parameter: WaterParameter) -> &'static str {
    match parameter {
        WaterParameter::Ph => "Install pH correction (lime or acid dosing)",
        WaterParameter::DissolvedOxygen => "Install aeration to raise dissolved oxygen",
        WaterParameter::Bod => "Treat organic waste before discharge",
        WaterParameter::NitrateN => "Control agricultural runoff and fertilizer use",
        WaterParameter::FecalColiform | WaterParameter::TotalColiform => {
            "Implement UV disinfection or chlorination"
        }
        WaterParameter::Temperature => "Protect stored water from heat to limit pathogen growth",
    }
}

fn monitoring_cadence(strong: bool) -> &'static [&'static str] {
    if strong {
        &[
            "Monitor water quality daily during the outbreak",
            "Publish weekly disease surveillance reports",
        ]
    } else {
        &[
            "Monitor water quality weekly",
            "Review disease trends monthly",
        ]
    }
}

/// Ordered list that keeps the first occurrence of each entry.
#[derive(Default)]
struct Recommendations(Vec<String>);

impl Recommendations {
    fn push(&mut self, item: &str) {
        if !self.0.iter().any(|existing| existing == item) {
            self.0.push(item.to_string());
        }
    }

    fn extend<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) {
        for item in items {
            self.push(item);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.0
    }
}
