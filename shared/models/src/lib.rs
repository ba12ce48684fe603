//! # HydroRisk Core Domain Models
//!
//! Value types for the integrated disease/water-quality risk assessment engine.
//! Every type here is an immutable snapshot: created per request, never
//! updated in place, and free of back-references.
//!
//! ## Key Models
//!
//! - **WaterSample**: raw chemical/biological readings with their reference bands
//! - **OutbreakContext**: reported case count, region and outbreak month
//! - **WqiResult**: Water Quality Index, category, violations and risk factors
//! - **DiseasePrediction**: case estimate, most likely disease and its probability
//! - **CorrelationResult**: how strongly water and disease risk reinforce each other
//! - **Report** / **FutureReport**: the aggregate outputs of one assessment
//!
//! ## Validation
//!
//! Input types derive `validator::Validate` with range rules for every field.
//! Finiteness and region lookups are checked by `hydrorisk-utils`.

pub mod water;
pub mod outbreak;
pub mod disease;
pub mod correlation;
pub mod report;


pub use water::*;
pub use outbreak::*;
pub use disease::*;
pub use correlation::*;
pub use report::*;
