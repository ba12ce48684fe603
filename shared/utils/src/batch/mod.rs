//! Batch Processing Module
//!
//! Parser for multi-scenario CSV inputs used by offline batch assessment.

pub mod parser;

pub use parser::{AssessmentRequest, BatchParser, BatchRow, ParsedBatch};
