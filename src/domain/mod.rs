//! Domain-level structures shared across the classifier.
//!
//! This module groups the banana variety labels, the prediction types the
//! pipeline produces, and the static catalog content rendered by the server.

pub mod catalog;
pub mod labels;
pub mod prediction;

pub use catalog::{ABOUT, AboutInfo, CATALOG, VarietyInfo};
pub use labels::BananaVariety;
pub use prediction::{Decision, PredictionResult, ProbabilityVector};
