//! HTTP Case Predictor
//!
//! Client for a model server that answers case-count predictions as JSON.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::predictor::{CaseEstimate, CasePredictor, PredictorError, PredictorFeatures, PredictorFuture};

/// Model server client
pub struct HttpCasePredictor {
    client: Client,
    endpoint: String,
}

impl HttpCasePredictor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the features and parse the estimate.
    async fn request(&self, features: &PredictorFeatures) -> Result<CaseEstimate> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(features)
            .send()
            .await
            .context("Failed to call case predictor")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Case predictor returned {}: {}", status, error_text);
        }

        let estimate: CaseEstimate = response
            .json()
            .await
            .context("Failed to parse case predictor response")?;

        Ok(estimate)
    }
}

impl CasePredictor for HttpCasePredictor {
    fn predict_cases<'a>(&'a self, features: &'a PredictorFeatures) -> PredictorFuture<'a> {
        Box::pin(async move { self.request(features).await.map_err(classify) })
    }
}

fn classify(error: anyhow::Error) -> PredictorError {
    match error.downcast_ref::<reqwest::Error>() {
        Some(e) if e.is_timeout() => PredictorError::Timeout,
        Some(e) if e.is_connect() => PredictorError::Unavailable,
        _ => PredictorError::Failed(format!("{:#}", error)),
    }
}
