//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use hydrorisk_models::{AlertLevel, OutbreakContext, WaterSample};
use hydrorisk_utils::AssessmentRequest;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "hydrorisk",
    version,
    about = "Integrated disease and water-quality risk assessment"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Write JSON output to this file instead of stdout.
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    /// Skip the case predictor even if one is configured.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Lowest alert level that is reported as needing notification.
    #[arg(long, global = true)]
    pub alert_threshold: Option<AlertLevel>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess a single scenario from flags or a JSON request file.
    Quick(QuickArgs),
    /// Assess every row of a CSV file.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
pub struct QuickArgs {
    /// JSON file holding `{ water, outbreak, months_ahead, water_overrides }`.
    #[arg(
        long,
        conflicts_with_all = [
            "cases", "region", "month", "ph", "dissolved_oxygen", "bod", "nitrate",
            "fecal_coliform", "total_coliform", "temperature",
        ]
    )]
    pub request: Option<PathBuf>,

    /// Reported case count.
    #[arg(long, required_unless_present = "request", allow_negative_numbers = true)]
    pub cases: Option<i64>,

    /// Region code (1 Assam .. 8 Sikkim).
    #[arg(long, default_value_t = 1)]
    pub region: u8,

    /// Outbreak month (1-12).
    #[arg(long, default_value_t = 7)]
    pub month: u8,

    #[arg(long, default_value_t = 7.0)]
    pub ph: f64,

    /// Dissolved oxygen, mg/L.
    #[arg(long = "do", default_value_t = 5.0)]
    pub dissolved_oxygen: f64,

    /// Biochemical oxygen demand, mg/L.
    #[arg(long, default_value_t = 3.0)]
    pub bod: f64,

    /// Nitrate-N, mg/L.
    #[arg(long, default_value_t = 5.0)]
    pub nitrate: f64,

    /// Fecal coliform, CFU/100 mL.
    #[arg(long = "fc", default_value_t = 20.0)]
    pub fecal_coliform: f64,

    /// Total coliform, CFU/100 mL.
    #[arg(long = "tc", default_value_t = 100.0)]
    pub total_coliform: f64,

    /// Water temperature, °C.
    #[arg(long = "temp", default_value_t = 25.0)]
    pub temperature: f64,

    /// Forward months to project (defaults to the configured value).
    #[arg(long)]
    pub months_ahead: Option<u32>,
}

impl QuickArgs {
    /// Request assembled from flags. Only meaningful without `--request`.
    pub fn flag_request(&self) -> AssessmentRequest {
        AssessmentRequest {
            water: WaterSample {
                ph: self.ph,
                dissolved_oxygen: self.dissolved_oxygen,
                bod: self.bod,
                nitrate_n: self.nitrate,
                fecal_coliform: self.fecal_coliform,
                total_coliform: self.total_coliform,
                temperature: self.temperature,
            },
            outbreak: OutbreakContext::new(self.cases.unwrap_or_default(), self.region, self.month),
            months_ahead: self.months_ahead,
            water_overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV file, one scenario per row.
    pub input: PathBuf,

    /// Forward months to project for each row.
    #[arg(long, default_value_t = 0)]
    pub months_ahead: u32,
}
