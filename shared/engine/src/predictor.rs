//! Case-count oracle capability.
//!
//! The engine holds an optional `Arc<dyn CasePredictor>`. Every call goes
//! through [`PredictorGuard`], which bounds it with a timeout and a small
//! retry budget; whatever the oracle does, the caller gets either a usable
//! estimate or `None` and falls back to the rule-based path.

use hydrorisk_models::OutbreakContext;
use hydrorisk_utils::HydroRiskError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Features sent to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictorFeatures {
    pub case_count: i64,
    pub region_code: u8,
    pub outbreak_month: u8,
    pub season_code: u8,
    /// Derived; the underlying model was trained on deaths.
    pub estimated_deaths: i64,
}

impl PredictorFeatures {
    const CASE_FATALITY_RATE: f64 = 0.03;

    pub fn from_outbreak(outbreak: &OutbreakContext) -> Self {
        let deaths = (outbreak.cases() * Self::CASE_FATALITY_RATE).floor() as i64;

        Self {
            case_count: outbreak.case_count,
            region_code: outbreak.region_code,
            outbreak_month: outbreak.outbreak_month,
            season_code: outbreak.season().code(),
            estimated_deaths: deaths.max(1),
        }
    }
}

/// Oracle answer: a case count and a free-form confidence tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseEstimate {
    pub predicted_cases: f64,
    #[serde(default)]
    pub confidence: String,
}

impl CaseEstimate {
    pub fn is_usable(&self) -> bool {
        self.predicted_cases.is_finite() && self.predicted_cases >= 0.0
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictorError {
    #[error("case predictor unavailable")]
    Unavailable,

    #[error("case predictor timed out")]
    Timeout,

    #[error("case predictor failed: {0}")]
    Failed(String),
}

impl From<PredictorError> for HydroRiskError {
    fn from(error: PredictorError) -> Self {
        HydroRiskError::predictor(error.to_string())
    }
}

pub type PredictorFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CaseEstimate, PredictorError>> + Send + 'a>>;

pub trait CasePredictor: Send + Sync {
    fn predict_cases<'a>(&'a self, features: &'a PredictorFeatures) -> PredictorFuture<'a>;
}

/// Timeout and retry policy around a predictor.
#[derive(Clone)]
pub struct PredictorGuard {
    predictor: Arc<dyn CasePredictor>,
    timeout: Duration,
    max_retries: u32,
}

impl PredictorGuard {
    pub fn new(predictor: Arc<dyn CasePredictor>, timeout: Duration, max_retries: u32) -> Self {
        Self {
            predictor,
            timeout,
            max_retries,
        }
    }

    pub fn predictor(&self) -> Arc<dyn CasePredictor> {
        Arc::clone(&self.predictor)
    }

    /// Query the predictor, retrying timeouts and failures. `Unavailable` is
    /// not retried.
    pub async fn query(&self, features: &PredictorFeatures) -> Result<CaseEstimate, PredictorError> {
        let mut attempt = 0;

        loop {
            let result =
                match tokio::time::timeout(self.timeout, self.predictor.predict_cases(features)).await
                {
                    Ok(Ok(estimate)) if estimate.is_usable() => Ok(estimate),
                    Ok(Ok(estimate)) => Err(PredictorError::Failed(format!(
                        "unusable case estimate {}",
                        estimate.predicted_cases
                    ))),
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(PredictorError::Timeout),
                };

            match result {
                Ok(estimate) => return Ok(estimate),
                Err(PredictorError::Unavailable) => return Err(PredictorError::Unavailable),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    debug!(attempt, error = %e, "Retrying case predictor");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Usable estimate or `None`; failures are logged, never propagated.
    pub async fn estimate(&self, features: &PredictorFeatures) -> Option<CaseEstimate> {
        match self.query(features).await {
            Ok(estimate) => Some(estimate),
            Err(e) => {
                let error = HydroRiskError::from(e);
                warn!(
                    code = error.error_code(),
                    reason = %error,
                    "Case predictor failed, using rule-based estimate"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        calls: AtomicU32,
        failures: u32,
    }

    impl CasePredictor for Flaky {
        fn predict_cases<'a>(&'a self, _features: &'a PredictorFeatures) -> PredictorFuture<'a> {
            Box::pin(async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                if call < self.failures {
                    Err(PredictorError::Failed("boom".to_string()))
                } else {
                    Ok(CaseEstimate {
                        predicted_cases: 120.0,
                        confidence: "medium".to_string(),
                    })
                }
            })
        }
    }

    struct Offline {
        calls: AtomicU32,
    }

    impl CasePredictor for Offline {
        fn predict_cases<'a>(&'a self, _features: &'a PredictorFeatures) -> PredictorFuture<'a> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Err(PredictorError::Unavailable)
            })
        }
    }

    fn features() -> PredictorFeatures {
        PredictorFeatures::from_outbreak(&OutbreakContext::new(200, 2, 7))
    }

    #[test]
    fn test_feature_derivation() {
        let f = features();
        assert_eq!(f.case_count, 200);
        assert_eq!(f.season_code, 2);
        assert_eq!(f.estimated_deaths, 6);

        let small = PredictorFeatures::from_outbreak(&OutbreakContext::new(10, 1, 1));
        assert_eq!(small.estimated_deaths, 1);
        assert_eq!(small.season_code, 4);
    }

    #[test]
    fn test_estimate_usability() {
        let ok = CaseEstimate { predicted_cases: 0.0, confidence: String::new() };
        assert!(ok.is_usable());
        let negative = CaseEstimate { predicted_cases: -1.0, confidence: String::new() };
        assert!(!negative.is_usable());
        let nan = CaseEstimate { predicted_cases: f64::NAN, confidence: String::new() };
        assert!(!nan.is_usable());
    }

    #[tokio::test]
    async fn test_retry_recovers_from_single_failure() {
        let flaky = Arc::new(Flaky { calls: AtomicU32::new(0), failures: 1 });
        let guard = PredictorGuard::new(flaky.clone(), Duration::from_millis(500), 1);

        let estimate = guard.estimate(&features()).await;
        assert_eq!(estimate.map(|e| e.predicted_cases), Some(120.0));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let flaky = Arc::new(Flaky { calls: AtomicU32::new(0), failures: 5 });
        let guard = PredictorGuard::new(flaky.clone(), Duration::from_millis(500), 2);

        let result = guard.query(&features()).await;
        assert_eq!(result, Err(PredictorError::Failed("boom".to_string())));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_predictor_error_converts() {
        let error = HydroRiskError::from(PredictorError::Timeout);
        assert_eq!(error.error_code(), "PREDICTOR_ERROR");
        assert_eq!(error.to_string(), "Case predictor error: case predictor timed out");
    }

    #[tokio::test]
    async fn test_unavailable_is_not_retried() {
        let offline = Arc::new(Offline { calls: AtomicU32::new(0) });
        let guard = PredictorGuard::new(offline.clone(), Duration::from_millis(500), 3);

        assert!(guard.estimate(&features()).await.is_none());
        assert_eq!(offline.calls.load(Ordering::SeqCst), 1);
    }
}
