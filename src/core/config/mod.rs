//! Configuration management for the classifier and the web server.
//!
//! This module provides configuration types, validation traits, and utilities
//! for loading configuration from files and the environment.

pub mod classifier;
pub mod errors;
pub mod onnx;
pub mod server;

pub use classifier::{ClassifierConfig, DEFAULT_MODEL_PATH};
pub use errors::{ConfigError, ConfigValidator};
pub use onnx::*;
pub use server::ServerConfig;
