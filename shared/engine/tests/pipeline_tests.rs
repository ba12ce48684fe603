//! HydroRisk Pipeline Tests
//!
//! End-to-end assessments through `RiskEngine`, with fake case predictors
//! standing in for the model server.

use chrono::{DateTime, TimeZone, Utc};
use hydrorisk_engine::{
    CaseEstimate, CasePredictor, PredictorError, PredictorFeatures, PredictorFuture, RiskEngine,
};
use hydrorisk_models::{
    AlertLevel, Confidence, Disease, OutbreakContext, PredictionMethod, WaterSample, WqiCategory,
};
use hydrorisk_utils::{BatchParser, EngineConfig, PredictorConfig};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 9, 30, 0).unwrap()
}

fn contaminated() -> WaterSample {
    WaterSample {
        ph: 8.6,
        dissolved_oxygen: 3.0,
        bod: 5.0,
        nitrate_n: 12.0,
        fecal_coliform: 80.0,
        total_coliform: 450.0,
        temperature: 28.0,
    }
}

fn clean() -> WaterSample {
    WaterSample {
        ph: 7.5,
        dissolved_oxygen: 7.0,
        bod: 1.0,
        nitrate_n: 2.0,
        fecal_coliform: 0.0,
        total_coliform: 10.0,
        temperature: 25.0,
    }
}

fn fast_predictor_config() -> PredictorConfig {
    PredictorConfig {
        endpoint: None,
        timeout_ms: 50,
        max_retries: 0,
    }
}

struct FixedPredictor(f64, &'static str);

impl CasePredictor for FixedPredictor {
    fn predict_cases<'a>(&'a self, _features: &'a PredictorFeatures) -> PredictorFuture<'a> {
        let estimate = CaseEstimate {
            predicted_cases: self.0,
            confidence: self.1.to_string(),
        };
        Box::pin(async move { Ok(estimate) })
    }
}

struct UnavailablePredictor;

impl CasePredictor for UnavailablePredictor {
    fn predict_cases<'a>(&'a self, _features: &'a PredictorFeatures) -> PredictorFuture<'a> {
        Box::pin(async { Err(PredictorError::Unavailable) })
    }
}

struct FailingPredictor;

impl CasePredictor for FailingPredictor {
    fn predict_cases<'a>(&'a self, _features: &'a PredictorFeatures) -> PredictorFuture<'a> {
        Box::pin(async { Err(PredictorError::Failed("model not loaded".to_string())) })
    }
}

struct SlowPredictor;

impl CasePredictor for SlowPredictor {
    fn predict_cases<'a>(&'a self, _features: &'a PredictorFeatures) -> PredictorFuture<'a> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(CaseEstimate {
                predicted_cases: 999.0,
                confidence: "high".to_string(),
            })
        })
    }
}

fn engine_with(predictor: Arc<dyn CasePredictor>) -> RiskEngine {
    RiskEngine::new(EngineConfig::default())
        .with_predictor_config(fast_predictor_config())
        .with_predictor(predictor)
}

#[tokio::test]
async fn test_contaminated_monsoon_outbreak() {
    let engine = RiskEngine::new(EngineConfig::default());
    let assessment = engine
        .assess_at(&contaminated(), &OutbreakContext::new(200, 2, 7), 3, timestamp())
        .await
        .unwrap();
    let report = &assessment.report;

    assert_eq!(report.wqi.category, WqiCategory::VeryPoor);
    assert_eq!(report.disease.most_likely_disease, Disease::Cholera);
    assert!(report.correlation.disease_water_match);
    assert!(report.correlation.critical_intervention_needed);
    assert!(matches!(report.alert_level, AlertLevel::High | AlertLevel::Critical));
    assert!(report.requires_notification(engine.notification_threshold()));
    assert_eq!(
        report.headline(),
        Some("URGENT: Implement immediate water treatment and health interventions")
    );
    assert_eq!(assessment.projections.len(), 3);
}

#[tokio::test]
async fn test_clean_water_small_outbreak() {
    let engine = RiskEngine::new(EngineConfig::default());
    let assessment = engine
        .assess_at(&clean(), &OutbreakContext::new(10, 1, 1), 0, timestamp())
        .await
        .unwrap();
    let report = &assessment.report;

    assert_eq!(report.wqi.category, WqiCategory::Excellent);
    assert_eq!(report.alert_level, AlertLevel::Low);
    assert!(!report.correlation.critical_intervention_needed);
    assert_eq!(
        report.headline(),
        Some("Continue routine water quality and disease monitoring")
    );
    assert!(!report.requires_notification(AlertLevel::High));
    assert!(assessment.projections.is_empty());
}

#[tokio::test]
async fn test_predictor_estimate_is_adopted() {
    let engine = engine_with(Arc::new(FixedPredictor(420.0, "High")));
    let report = engine
        .assess_at(&clean(), &OutbreakContext::new(10, 1, 7), 0, timestamp())
        .await
        .unwrap()
        .report;

    assert_eq!(report.disease.method, PredictionMethod::Predicted);
    assert_eq!(report.disease.predicted_cases, 420.0);
    assert_eq!(report.disease.confidence, Confidence::High);
    assert_eq!(report.disease.most_likely_disease, Disease::Cholera);
}

#[tokio::test]
async fn test_unavailable_predictor_falls_back() {
    let engine = engine_with(Arc::new(UnavailablePredictor));
    let report = engine
        .assess_at(&contaminated(), &OutbreakContext::new(200, 2, 7), 0, timestamp())
        .await
        .unwrap()
        .report;

    assert_eq!(report.disease.method, PredictionMethod::RuleBased);
    assert_eq!(report.disease.predicted_cases, 200.0);
}

#[tokio::test]
async fn test_failing_predictor_falls_back() {
    let engine = engine_with(Arc::new(FailingPredictor));
    let report = engine
        .assess_at(&clean(), &OutbreakContext::new(50, 3, 2), 0, timestamp())
        .await
        .unwrap()
        .report;

    assert_eq!(report.disease.method, PredictionMethod::RuleBased);
}

#[tokio::test]
async fn test_slow_predictor_times_out_and_falls_back() {
    let engine = engine_with(Arc::new(SlowPredictor));
    let report = engine
        .assess_at(&clean(), &OutbreakContext::new(50, 3, 2), 0, timestamp())
        .await
        .unwrap()
        .report;

    assert_eq!(report.disease.method, PredictionMethod::RuleBased);
    assert_eq!(report.disease.predicted_cases, 50.0);
}

#[tokio::test]
async fn test_unusable_estimate_falls_back() {
    let engine = engine_with(Arc::new(FixedPredictor(-12.0, "high")));
    let report = engine
        .assess_at(&clean(), &OutbreakContext::new(50, 3, 2), 0, timestamp())
        .await
        .unwrap()
        .report;

    assert_eq!(report.disease.method, PredictionMethod::RuleBased);
}

#[tokio::test]
async fn test_identical_inputs_give_identical_reports() {
    let engine = RiskEngine::new(EngineConfig::default());
    let outbreak = OutbreakContext::new(340, 4, 9);

    let first = engine.assess_at(&contaminated(), &outbreak, 2, timestamp()).await.unwrap();
    let second = engine.assess_at(&contaminated(), &outbreak, 2, timestamp()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.report.fingerprint, second.report.fingerprint);
}

#[tokio::test]
async fn test_fingerprint_ignores_timestamp() {
    let engine = RiskEngine::new(EngineConfig::default());
    let outbreak = OutbreakContext::new(120, 5, 3);

    let now = engine.assess(&clean(), &outbreak, 0).await.unwrap();
    let fixed = engine.assess_at(&clean(), &outbreak, 0, timestamp()).await.unwrap();

    assert_eq!(now.report.fingerprint, fixed.report.fingerprint);
    assert!(now.report.verify_integrity());
}

#[tokio::test]
async fn test_projection_wraps_into_new_year() {
    let engine = RiskEngine::new(EngineConfig::default());
    let assessment = engine
        .assess_at(&clean(), &OutbreakContext::new(100, 1, 11), 3, timestamp())
        .await
        .unwrap();

    let last = &assessment.projections[2];
    assert_eq!(last.month_offset, 3);
    assert_eq!(last.month, 2);
    assert_eq!(last.seasonal_factor, 0.6);
    assert_eq!(last.projected_cases, 60);
    assert_eq!(last.report.timestamp, timestamp());
}

#[tokio::test]
async fn test_projections_never_consult_predictor() {
    let engine = engine_with(Arc::new(FixedPredictor(900.0, "high")));
    let assessment = engine
        .assess_at(&clean(), &OutbreakContext::new(100, 1, 5), 2, timestamp())
        .await
        .unwrap();

    assert_eq!(assessment.report.disease.method, PredictionMethod::Predicted);
    assert!(assessment
        .projections
        .iter()
        .all(|p| p.report.disease.method == PredictionMethod::RuleBased));
}

#[tokio::test]
async fn test_invalid_input_names_field() {
    let engine = RiskEngine::new(EngineConfig::default());

    let bad_ph = WaterSample { ph: 14.5, ..clean() };
    let error = engine
        .assess_at(&bad_ph, &OutbreakContext::new(10, 1, 1), 0, timestamp())
        .await
        .unwrap_err();
    assert!(error.is_validation());
    assert_eq!(error.field(), Some("ph"));

    let error = engine
        .assess_at(&clean(), &OutbreakContext::new(10, 9, 1), 0, timestamp())
        .await
        .unwrap_err();
    assert_eq!(error.field(), Some("region_code"));

    let error = engine
        .assess_at(&clean(), &OutbreakContext::new(-1, 1, 1), 0, timestamp())
        .await
        .unwrap_err();
    assert_eq!(error.field(), Some("case_count"));
}

#[tokio::test]
async fn test_override_reaches_its_projected_month() {
    let engine = RiskEngine::new(EngineConfig::default());
    let overrides = BTreeMap::from([(1, contaminated())]);

    let assessment = engine
        .assess_with_overrides(
            &clean(),
            &OutbreakContext::new(200, 2, 6),
            2,
            &overrides,
            timestamp(),
        )
        .await
        .unwrap();

    let first = &assessment.projections[0].report;
    assert_eq!(first.water, contaminated());
    assert!(first.correlation.disease_water_match);
    let second = &assessment.projections[1].report;
    assert_eq!(second.water, clean());
    assert!(first.risk_scores.combined_risk > second.risk_scores.combined_risk);
}

#[tokio::test]
async fn test_nan_override_is_validation_error() {
    let engine = RiskEngine::new(EngineConfig::default());
    let overrides = BTreeMap::from([(1, WaterSample { bod: f64::NAN, ..clean() })]);

    let error = engine
        .assess_with_overrides(
            &clean(),
            &OutbreakContext::new(50, 1, 3),
            1,
            &overrides,
            timestamp(),
        )
        .await
        .unwrap_err();
    assert!(error.is_validation());
    assert_eq!(error.field(), Some("water_overrides.1.bod"));
}

prop_compose! {
    fn outbreak()(
        case_count in 0i64..50_000,
        region_code in 1u8..=8,
        outbreak_month in 1u8..=12,
    ) -> OutbreakContext {
        OutbreakContext::new(case_count, region_code, outbreak_month)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// An unavailable predictor never fails a valid assessment.
    #[test]
    fn prop_unavailable_predictor_always_falls_back(outbreak in outbreak()) {
        let engine = engine_with(Arc::new(UnavailablePredictor));

        let assessment = tokio_test::block_on(
            engine.assess_at(&clean(), &outbreak, 0, timestamp()),
        ).unwrap();

        prop_assert_eq!(assessment.report.disease.method, PredictionMethod::RuleBased);
        prop_assert_eq!(assessment.report.disease.predicted_cases, outbreak.case_count as f64);
    }
}

#[test]
fn test_batch_with_bad_row_assesses_the_rest() {
    let csv = "case_count,region_code,outbreak_month,ph,dissolved_oxygen,bod,nitrate_n,fecal_coliform,total_coliform,temperature\n\
               200,2,7,8.6,3.0,5.0,12.0,80,450,28\n\
               10,1,3,15.0,7.5,1.5,4,0,10,25\n\
               40,3,12,7.2,6.5,2.0,4,0,10,24";

    let batch = BatchParser::new().parse_csv("scenarios.csv", csv.as_bytes()).unwrap();
    let engine = RiskEngine::new(EngineConfig::default());

    let outcomes: Vec<_> = batch
        .valid_rows()
        .map(|(_, request)| engine.assess_offline(&request.water, &request.outbreak, 0, timestamp()))
        .collect();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 2);
    let error = outcomes[1].as_ref().unwrap_err();
    assert_eq!(error.field(), Some("ph"));
}
