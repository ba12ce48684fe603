//! # HydroRisk Engine
//!
//! Integrated disease/water-quality risk assessment.
//!
//! ## Pipeline
//!
//! 1. [`wqi`] scores the water sample against its reference bands.
//! 2. [`disease`] estimates the case count and most likely disease, from the
//!    optional [`CasePredictor`] or the rule-based table.
//! 3. [`correlation`] measures how strongly the two risks reinforce each other.
//! 4. [`aggregation`] combines the scores into one alert level.
//! 5. [`recommendations`] produces the ordered action list.
//! 6. [`projection`] repeats 1-5 for forward months under the seasonal model.
//!
//! [`RiskEngine`] runs the whole pipeline after validating inputs.

pub mod aggregation;
pub mod correlation;
pub mod disease;
pub mod http_predictor;
pub mod pipeline;
pub mod predictor;
pub mod projection;
pub mod recommendations;
pub mod wqi;

pub use http_predictor::HttpCasePredictor;
pub use pipeline::RiskEngine;
pub use predictor::{
    CaseEstimate, CasePredictor, PredictorError, PredictorFeatures, PredictorFuture, PredictorGuard,
};
pub use projection::ProjectionRequest;
pub use recommendations::RecommendationInput;
