//! Batch assessment over a parsed CSV.

use chrono::{DateTime, Utc};
use hydrorisk_engine::RiskEngine;
use hydrorisk_models::{AlertLevel, Disease, WqiCategory};
use hydrorisk_utils::{ErrorResponse, ParsedBatch};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

/// Condensed view of one row's assessment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssessmentSummary {
    pub wqi_score: f64,
    pub wqi_category: WqiCategory,
    pub most_likely_disease: Disease,
    pub disease_probability: f64,
    pub combined_risk: f64,
    pub alert_level: AlertLevel,
    pub peak_alert_level: AlertLevel,
    pub headline: Option<String>,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Ok {
        row_number: usize,
        summary: AssessmentSummary,
    },
    Error {
        row_number: usize,
        error: ErrorResponse,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub filename: String,
    pub total_rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub parse_warnings: Vec<String>,
    pub outcomes: Vec<BatchOutcome>,
}

/// Assess every row on the rule-based path. Bad rows become error entries.
pub fn run(
    engine: &RiskEngine,
    batch: &ParsedBatch,
    months_ahead: u32,
    timestamp: DateTime<Utc>,
) -> BatchReport {
    let outcomes: Vec<BatchOutcome> = batch
        .rows
        .iter()
        .map(|row| {
            let result = row.request.clone().and_then(|request| {
                engine.assess_offline(&request.water, &request.outbreak, months_ahead, timestamp)
            });

            match result {
                Ok(assessment) => BatchOutcome::Ok {
                    row_number: row.row_number,
                    summary: AssessmentSummary {
                        wqi_score: assessment.report.wqi.score,
                        wqi_category: assessment.report.wqi.category,
                        most_likely_disease: assessment.report.disease.most_likely_disease,
                        disease_probability: assessment.report.disease.disease_probability,
                        combined_risk: assessment.report.risk_scores.combined_risk,
                        alert_level: assessment.report.alert_level,
                        peak_alert_level: assessment.peak_alert_level(),
                        headline: assessment.report.headline().map(str::to_string),
                        fingerprint: assessment.report.fingerprint.clone(),
                    },
                },
                Err(error) => {
                    warn!(row = row.row_number, error = %error, "Skipping batch row");
                    BatchOutcome::Error {
                        row_number: row.row_number,
                        error: error.into(),
                    }
                }
            }
        })
        .collect();

    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, BatchOutcome::Error { .. }))
        .count();

    BatchReport {
        batch_id: batch.id,
        filename: batch.filename.clone(),
        total_rows: batch.total_rows,
        succeeded: outcomes.len() - failed,
        failed,
        parse_warnings: batch.parse_warnings.clone(),
        outcomes,
    }
}
