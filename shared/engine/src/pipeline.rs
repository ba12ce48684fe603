//! Risk Engine
//!
//! Facade over the full assessment: validation, WQI and disease estimation,
//! correlation, aggregation, recommendations and projections.

use chrono::{DateTime, Utc};
use hydrorisk_models::{
    AlertLevel, Assessment, DiseasePrediction, OutbreakContext, Report, WaterSample,
};
use hydrorisk_utils::{
    validate_months_ahead, validate_outbreak, validate_water_overrides, validate_water_sample,
    EngineConfig, HydroRiskResult, PredictorConfig,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::aggregation;
use crate::correlation;
use crate::disease;
use crate::http_predictor::HttpCasePredictor;
use crate::predictor::{CasePredictor, PredictorFeatures, PredictorGuard};
use crate::projection::{self, ProjectionRequest};
use crate::recommendations::{self, RecommendationInput};
use crate::wqi;

/// Assessment engine. Stateless apart from configuration; share via `Arc`.
#[derive(Clone)]
pub struct RiskEngine {
    config: EngineConfig,
    predictor: Option<PredictorGuard>,
    predictor_config: PredictorConfig,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            predictor: None,
            predictor_config: PredictorConfig::default(),
        }
    }

    /// Build from configuration, wiring the HTTP predictor when an endpoint is set.
    pub fn from_config(engine: EngineConfig, predictor: PredictorConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_millis(predictor.timeout_ms);
        let mut risk_engine = Self::new(engine).with_predictor_config(predictor.clone());

        if let Some(endpoint) = &predictor.endpoint {
            let client = HttpCasePredictor::new(endpoint.clone(), timeout)?;
            info!(endpoint = %client.endpoint(), "Case predictor configured");
            risk_engine = risk_engine.with_predictor(Arc::new(client));
        }

        Ok(risk_engine)
    }

    pub fn with_predictor_config(mut self, config: PredictorConfig) -> Self {
        if let Some(guard) = self.predictor.take() {
            self.predictor = Some(PredictorGuard::new(
                guard.predictor(),
                Duration::from_millis(config.timeout_ms),
                config.max_retries,
            ));
        }
        self.predictor_config = config;
        self
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn CasePredictor>) -> Self {
        self.predictor = Some(PredictorGuard::new(
            predictor,
            Duration::from_millis(self.predictor_config.timeout_ms),
            self.predictor_config.max_retries,
        ));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn notification_threshold(&self) -> AlertLevel {
        self.config.alert_threshold
    }

    /// Full assessment stamped with the current time.
    pub async fn assess(
        &self,
        water: &WaterSample,
        outbreak: &OutbreakContext,
        months_ahead: u32,
    ) -> HydroRiskResult<Assessment> {
        self.assess_at(water, outbreak, months_ahead, Utc::now()).await
    }

    /// Full assessment with a caller-supplied timestamp. Identical inputs give
    /// identical output.
    pub async fn assess_at(
        &self,
        water: &WaterSample,
        outbreak: &OutbreakContext,
        months_ahead: u32,
        timestamp: DateTime<Utc>,
    ) -> HydroRiskResult<Assessment> {
        self.assess_with_overrides(water, outbreak, months_ahead, &BTreeMap::new(), timestamp)
            .await
    }

    /// Full assessment where some projected months use expected water readings
    /// instead of the current sample. Keys are month offsets in `1..=months_ahead`.
    pub async fn assess_with_overrides(
        &self,
        water: &WaterSample,
        outbreak: &OutbreakContext,
        months_ahead: u32,
        water_overrides: &BTreeMap<u32, WaterSample>,
        timestamp: DateTime<Utc>,
    ) -> HydroRiskResult<Assessment> {
        let request =
            self.validated_request(water, outbreak, months_ahead, water_overrides, timestamp)?;

        info!(
            region = outbreak.region_code,
            month = outbreak.outbreak_month,
            cases = outbreak.case_count,
            overrides = water_overrides.len(),
            "Starting risk assessment"
        );

        let estimate = match &self.predictor {
            Some(guard) => guard.estimate(&PredictorFeatures::from_outbreak(outbreak)).await,
            None => None,
        };
        let prediction = disease::estimate(outbreak, estimate.as_ref());

        self.finish(&request, prediction)
    }

    /// Rule-based assessment that never consults the predictor.
    pub fn assess_offline(
        &self,
        water: &WaterSample,
        outbreak: &OutbreakContext,
        months_ahead: u32,
        timestamp: DateTime<Utc>,
    ) -> HydroRiskResult<Assessment> {
        let request =
            self.validated_request(water, outbreak, months_ahead, &BTreeMap::new(), timestamp)?;

        let prediction = disease::rule_based(outbreak);
        self.finish(&request, prediction)
    }

    fn validated_request(
        &self,
        water: &WaterSample,
        outbreak: &OutbreakContext,
        months_ahead: u32,
        water_overrides: &BTreeMap<u32, WaterSample>,
        timestamp: DateTime<Utc>,
    ) -> HydroRiskResult<ProjectionRequest> {
        validate_water_sample(water)?;
        validate_outbreak(outbreak)?;
        validate_months_ahead(months_ahead, self.config.max_months_ahead)?;
        validate_water_overrides(water_overrides, months_ahead)?;

        Ok(ProjectionRequest {
            water: *water,
            outbreak: *outbreak,
            months_ahead,
            water_overrides: water_overrides.clone(),
            timestamp,
        })
    }

    fn finish(
        &self,
        request: &ProjectionRequest,
        prediction: DiseasePrediction,
    ) -> HydroRiskResult<Assessment> {
        let report =
            compose_report(request.water, request.outbreak, prediction, request.timestamp)?;

        let projections = if request.months_ahead > 0 {
            projection::project(request)?
        } else {
            Vec::new()
        };

        info!(
            alert_level = %report.alert_level,
            combined_risk = report.risk_scores.combined_risk,
            disease = %report.disease.most_likely_disease,
            method = ?report.disease.method,
            projections = projections.len(),
            "Risk assessment complete"
        );

        Ok(Assessment { report, projections })
    }
}

/// Run the water, correlation, aggregation and recommendation stages around a
/// disease prediction.
pub(crate) fn compose_report(
    water: WaterSample,
    outbreak: OutbreakContext,
    prediction: DiseasePrediction,
    timestamp: DateTime<Utc>,
) -> HydroRiskResult<Report> {
    let wqi = wqi::calculate(&water);
    let correlation = correlation::analyze(&wqi, &prediction);
    let (risk_scores, alert_level) = aggregation::aggregate(&wqi, &prediction, &correlation)?;

    debug!(
        wqi = wqi.score,
        disease_probability = prediction.disease_probability,
        correlation = correlation.score,
        combined = risk_scores.combined_risk,
        "Component scores"
    );

    let recommendations = recommendations::generate(&RecommendationInput {
        wqi: &wqi,
        disease: &prediction,
        correlation: &correlation,
        alert_level,
    });

    Ok(Report::new(
        water,
        outbreak,
        wqi,
        prediction,
        correlation,
        risk_scores,
        alert_level,
        recommendations,
        timestamp,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hydrorisk_models::PredictionMethod;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_offline_assessment() {
        let engine = RiskEngine::new(EngineConfig::default());
        let assessment = engine
            .assess_offline(&WaterSample::default(), &OutbreakContext::new(200, 2, 7), 3, timestamp())
            .unwrap();

        assert_eq!(assessment.report.disease.method, PredictionMethod::RuleBased);
        assert_eq!(assessment.projections.len(), 3);
        assert!(assessment.report.verify_integrity());
    }

    #[test]
    fn test_validation_precedes_computation() {
        let engine = RiskEngine::new(EngineConfig::default());
        let error = engine
            .assess_offline(&WaterSample::default(), &OutbreakContext::new(10, 1, 0), 0, timestamp())
            .unwrap_err();
        assert_eq!(error.field(), Some("outbreak_month"));

        let error = engine
            .assess_offline(&WaterSample::default(), &OutbreakContext::new(10, 1, 3), 13, timestamp())
            .unwrap_err();
        assert_eq!(error.field(), Some("months_ahead"));
    }

    #[test]
    fn test_non_finite_reading_is_internal_error() {
        // Bypasses validation to reach the arithmetic directly.
        let water = WaterSample { bod: f64::NAN, ..WaterSample::default() };
        let outbreak = OutbreakContext::new(50, 1, 3);

        let error =
            compose_report(water, outbreak, disease::rule_based(&outbreak), timestamp()).unwrap_err();
        assert_eq!(error.error_code(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_overrides_flow_into_projections() {
        let engine = RiskEngine::new(EngineConfig::default());
        let polluted = WaterSample { fecal_coliform: 400.0, ..WaterSample::default() };
        let overrides = BTreeMap::from([(2, polluted)]);

        let assessment = engine
            .assess_with_overrides(
                &WaterSample::default(),
                &OutbreakContext::new(80, 1, 4),
                2,
                &overrides,
                timestamp(),
            )
            .await
            .unwrap();

        assert_eq!(assessment.report.water, WaterSample::default());
        assert_eq!(assessment.projections[0].report.water, WaterSample::default());
        assert_eq!(assessment.projections[1].report.water, polluted);
    }

    #[tokio::test]
    async fn test_invalid_override_rejected_before_assessment() {
        let engine = RiskEngine::new(EngineConfig::default());
        let overrides = BTreeMap::from([(
            1,
            WaterSample { ph: -3.0, fecal_coliform: -50.0, ..WaterSample::default() },
        )]);

        let error = engine
            .assess_with_overrides(
                &WaterSample::default(),
                &OutbreakContext::new(100, 1, 5),
                2,
                &overrides,
                timestamp(),
            )
            .await
            .unwrap_err();
        assert_eq!(error.field(), Some("water_overrides.1.fecal_coliform"));
    }

    #[test]
    fn test_from_config_without_endpoint_is_offline() {
        let engine =
            RiskEngine::from_config(EngineConfig::default(), PredictorConfig::default()).unwrap();
        assert!(engine.predictor.is_none());
        assert_eq!(engine.notification_threshold(), AlertLevel::High);
        assert_eq!(engine.config().default_months_ahead, 3);
    }

    #[test]
    fn test_from_config_with_endpoint_wires_predictor() {
        let predictor = PredictorConfig {
            endpoint: Some("http://127.0.0.1:9/predict".to_string()),
            ..PredictorConfig::default()
        };
        let engine = RiskEngine::from_config(EngineConfig::default(), predictor).unwrap();
        assert!(engine.predictor.is_some());
    }
}
