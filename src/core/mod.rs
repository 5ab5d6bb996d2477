//! The core module of the classifier.
//!
//! This module contains the fundamental components of the classifier, including:
//! - Tensor type aliases
//! - Configuration management
//! - Constants used throughout the crate
//! - Error handling
//! - ONNX Runtime integration
//! - The inference engine trait
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod traits;

pub use batch::{Tensor2D, Tensor4D};
pub use config::{ClassifierConfig, ConfigError, ConfigValidator, ServerConfig};
pub use constants::*;
pub use errors::{BanaError, BanaResult, ProcessingStage};
pub use inference::{OrtInfer, load_session};
pub use traits::InferenceEngine;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// The filter is read from `RUST_LOG` and falls back to `info`.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
