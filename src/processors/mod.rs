//! Image and output processing for the banana classifier.
//!
//! # Modules
//!
//! * `normalization` - Turns resized RGB images into model input tensors
//! * `topk` - Ranking and arg-max over classifier scores
//! * `decision` - Confidence threshold gating
//! * `types` - Type definitions used across the processors module

mod decision;
mod normalization;
mod topk;
pub mod types;

pub use decision::ConfidenceGate;
pub use normalization::*;
pub use topk::{Topk, TopkResult};
pub use types::*;
