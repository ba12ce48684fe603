//! HydroRisk Assessment CLI
//!
//! Runs the integrated disease/water-quality assessment for a single scenario
//! (`quick`) or for every row of a CSV file (`batch`) and prints JSON.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use hydrorisk_engine::RiskEngine;
use hydrorisk_models::Assessment;
use hydrorisk_utils::{
    init_logging, log_error, AppConfig, AssessmentRequest, BatchParser, ErrorResponse,
    HydroRiskError,
};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};

mod args;
mod batch;

use args::{BatchArgs, Cli, Command, QuickArgs};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(threshold) = cli.alert_threshold {
        config.engine.alert_threshold = threshold;
    }
    init_logging(&config.logging)?;
    info!("Starting HydroRisk assessment");

    let engine = if cli.offline {
        RiskEngine::new(config.engine)
    } else {
        RiskEngine::from_config(config.engine, config.predictor)?
    };

    match &cli.command {
        Command::Quick(args) => run_quick(&engine, &cli, args).await,
        Command::Batch(args) => run_batch(&engine, &cli, args),
    }
}

async fn run_quick(engine: &RiskEngine, cli: &Cli, args: &QuickArgs) -> Result<ExitCode> {
    let request = match &args.request {
        Some(path) => AssessmentRequest::from_json_file(path)
            .with_context(|| format!("Failed to load request {}", path.display()))?,
        None => args.flag_request(),
    };
    let months_ahead = args
        .months_ahead
        .or(request.months_ahead)
        .unwrap_or(engine.config().default_months_ahead);

    let result = engine
        .assess_with_overrides(
            &request.water,
            &request.outbreak,
            months_ahead,
            &request.water_overrides,
            Utc::now(),
        )
        .await;

    match result {
        Ok(assessment) => {
            announce(engine, &assessment);
            write_json(&assessment, cli.output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error @ HydroRiskError::Validation { .. }) => {
            log_error!(error, "Invalid assessment input");
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&ErrorResponse::from(error))?
            );
            Ok(ExitCode::from(1))
        }
        Err(error) => Err(error).context("Assessment failed"),
    }
}

fn run_batch(engine: &RiskEngine, cli: &Cli, args: &BatchArgs) -> Result<ExitCode> {
    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let filename = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parsed = BatchParser::new().parse_csv(&filename, &data)?;
    info!(batch_id = %parsed.id, rows = parsed.total_rows, "Parsed batch input");

    let report = batch::run(engine, &parsed, args.months_ahead, Utc::now());
    info!(
        batch_id = %report.batch_id,
        succeeded = report.succeeded,
        failed = report.failed,
        "Batch assessment complete"
    );

    write_json(&report, cli.output.as_deref())?;
    Ok(ExitCode::SUCCESS)
}

/// Flag reports that cross the configured notification threshold.
fn announce(engine: &RiskEngine, assessment: &Assessment) {
    let report = &assessment.report;
    if report.requires_notification(engine.notification_threshold()) {
        warn!(
            alert_level = %report.alert_level,
            headline = report.headline().unwrap_or_default(),
            "Alert threshold reached"
        );
    }
    if assessment.peak_alert_level() > report.alert_level {
        info!(
            peak = %assessment.peak_alert_level(),
            "Projected alert level rises above current"
        );
    }
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
