use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum HydroRiskError {
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Case predictor error: {message}")]
    Predictor { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl HydroRiskError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn predictor(message: impl Into<String>) -> Self {
        Self::Predictor {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Predictor { .. } => "PREDICTOR_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Offending input field for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

pub type HydroRiskResult<T> = Result<T, HydroRiskError>;

/// Serializable error body for batch outputs and CLI reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub field: Option<String>,
}

impl From<HydroRiskError> for ErrorResponse {
    fn from(error: HydroRiskError) -> Self {
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            field: error.field().map(str::to_string),
        }
    }
}

// Conversion from common error types
impl From<serde_json::Error> for HydroRiskError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON: {}", error))
    }
}

impl From<csv::Error> for HydroRiskError {
    fn from(error: csv::Error) -> Self {
        Self::parse(format!("CSV: {}", error))
    }
}

impl From<std::io::Error> for HydroRiskError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<config::ConfigError> for HydroRiskError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}
