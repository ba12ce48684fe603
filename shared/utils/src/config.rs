use config::{Config, Environment, File};
use hydrorisk_models::AlertLevel;
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::HydroRiskResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub predictor: PredictorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub default_months_ahead: u32,
    pub max_months_ahead: u32,
    /// Reports at or above this level warrant an external notification.
    pub alert_threshold: AlertLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictorConfig {
    /// Model server endpoint. `None` runs rule-based only.
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    /// Layered load: built-in defaults, `config/default`, `config/{ENVIRONMENT}`,
    /// `config/local`, then `HYDRORISK__*` variables.
    pub fn load() -> HydroRiskResult<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let defaults = AppConfig::default();

        let config = Config::builder()
            .set_default("engine.default_months_ahead", defaults.engine.default_months_ahead)?
            .set_default("engine.max_months_ahead", defaults.engine.max_months_ahead)?
            .set_default("engine.alert_threshold", "High")?
            .set_default("predictor.timeout_ms", defaults.predictor.timeout_ms)?
            .set_default("predictor.max_retries", defaults.predictor.max_retries)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            // Start with default values
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with HYDRORISK prefix
            .add_source(Environment::with_prefix("HYDRORISK").separator("__"));

        Ok(config.build()?.try_deserialize()?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            predictor: PredictorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_months_ahead: 3,
            max_months_ahead: 12,
            alert_threshold: AlertLevel::High,
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 2000,
            max_retries: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}
