//! Batch Input Parser
//!
//! Reads outbreak/water-quality scenarios from CSV. Each data row becomes one
//! assessment input; malformed rows are reported individually and never abort
//! the rest of the batch.

use anyhow::{Context, Result};
use hydrorisk_models::{OutbreakContext, WaterParameter, WaterSample};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use uuid::Uuid;

use crate::error::{HydroRiskError, HydroRiskResult};

/// One assessment request: the shape accepted from JSON and produced by each
/// CSV row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentRequest {
    pub water: WaterSample,
    pub outbreak: OutbreakContext,
    #[serde(default)]
    pub months_ahead: Option<u32>,
    /// Expected water readings keyed by projected month offset.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub water_overrides: BTreeMap<u32, WaterSample>,
}

impl AssessmentRequest {
    pub fn from_json_file(path: &Path) -> HydroRiskResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// A parsed CSV row. `request` carries the row-level parse error if any cell
/// could not be read.
#[derive(Debug, Clone)]
pub struct BatchRow {
    pub row_number: usize,
    pub request: HydroRiskResult<AssessmentRequest>,
}

#[derive(Debug, Clone)]
pub struct ParsedBatch {
    pub id: Uuid,
    pub filename: String,
    pub rows: Vec<BatchRow>,
    pub column_headers: Vec<String>,
    pub total_rows: usize,
    pub parse_warnings: Vec<String>,
}

impl ParsedBatch {
    pub fn valid_rows(&self) -> impl Iterator<Item = (usize, &AssessmentRequest)> {
        self.rows
            .iter()
            .filter_map(|row| row.request.as_ref().ok().map(|r| (row.row_number, r)))
    }
}

const DEFAULT_REGION_CODE: u8 = 1;
const DEFAULT_OUTBREAK_MONTH: u8 = 7;

/// CSV parser with column-name aliases for each field.
pub struct BatchParser {
    case_columns: Vec<String>,
    region_columns: Vec<String>,
    month_columns: Vec<String>,
    parameter_columns: Vec<(WaterParameter, Vec<String>)>,
}

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl Default for BatchParser {
    fn default() -> Self {
        Self {
            case_columns: aliases(&["case_count", "cases", "no_of_cases"]),
            region_columns: aliases(&["region_code", "region", "state", "northeast_state"]),
            month_columns: aliases(&["outbreak_month", "month", "start_of_outbreak_month"]),
            parameter_columns: vec![
                (WaterParameter::Ph, aliases(&["ph"])),
                (WaterParameter::DissolvedOxygen, aliases(&["dissolved_oxygen", "do"])),
                (WaterParameter::Bod, aliases(&["bod"])),
                (WaterParameter::NitrateN, aliases(&["nitrate_n", "nitrate"])),
                (WaterParameter::FecalColiform, aliases(&["fecal_coliform", "fc"])),
                (WaterParameter::TotalColiform, aliases(&["total_coliform", "tc"])),
                (WaterParameter::Temperature, aliases(&["temperature", "temp"])),
            ],
        }
    }
}

impl BatchParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse CSV batch input from bytes.
    pub fn parse_csv(&self, filename: &str, data: &[u8]) -> Result<ParsedBatch> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.to_lowercase().trim().to_string())
            .collect();

        self.check_required_columns(&headers)?;

        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let row_number = idx + 2;
            match result {
                Ok(record) => {
                    let raw_data: HashMap<String, String> = headers
                        .iter()
                        .enumerate()
                        .filter_map(|(i, h)| record.get(i).map(|v| (h.clone(), v.to_string())))
                        .collect();

                    rows.push(BatchRow {
                        row_number,
                        request: self.map_row(&raw_data),
                    });
                }
                Err(e) => {
                    warnings.push(format!("Row {}: Parse error - {}", row_number, e));
                    rows.push(BatchRow {
                        row_number,
                        request: Err(e.into()),
                    });
                }
            }
        }

        Ok(ParsedBatch {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            total_rows: rows.len(),
            rows,
            column_headers: headers,
            parse_warnings: warnings,
        })
    }

    fn check_required_columns(&self, headers: &[String]) -> Result<()> {
        let mut missing = Vec::new();

        if !self.case_columns.iter().any(|c| headers.contains(c)) {
            missing.push("case_count");
        }
        for (parameter, columns) in &self.parameter_columns {
            if !columns.iter().any(|c| headers.contains(c)) {
                missing.push(parameter.field_name());
            }
        }

        if !missing.is_empty() {
            anyhow::bail!("Missing required columns: {}", missing.join(", "));
        }
        Ok(())
    }

    fn map_row(&self, raw_data: &HashMap<String, String>) -> HydroRiskResult<AssessmentRequest> {
        let case_count = self
            .find_value(&self.case_columns, raw_data)
            .ok_or_else(|| HydroRiskError::validation("case_count", "Missing case count"))
            .and_then(|v| parse_number::<i64>("case_count", &v))?;

        let region_code = match self.find_value(&self.region_columns, raw_data) {
            Some(v) => parse_number::<u8>("region_code", &v)?,
            None => DEFAULT_REGION_CODE,
        };

        let outbreak_month = match self.find_value(&self.month_columns, raw_data) {
            Some(v) => parse_number::<u8>("outbreak_month", &v)?,
            None => DEFAULT_OUTBREAK_MONTH,
        };

        let mut water = WaterSample::default();
        for (parameter, columns) in &self.parameter_columns {
            let field = parameter.field_name();
            let value = self
                .find_value(columns, raw_data)
                .ok_or_else(|| HydroRiskError::validation(field, "Missing reading"))
                .and_then(|v| parse_number::<f64>(field, &v))?;
            water = water.with_value(*parameter, value);
        }

        Ok(AssessmentRequest {
            water,
            outbreak: OutbreakContext::new(case_count, region_code, outbreak_month),
            months_ahead: None,
            water_overrides: BTreeMap::new(),
        })
    }

    /// Find value by checking multiple possible column names
    fn find_value(&self, candidates: &[String], data: &HashMap<String, String>) -> Option<String> {
        for candidate in candidates {
            if let Some(value) = data.get(candidate) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> HydroRiskResult<T> {
    raw.parse::<T>()
        .map_err(|_| HydroRiskError::validation(field, format!("Could not parse '{}' as a number", raw)))
}
