//! Error types for the classification pipeline.
//!
//! The variants follow the failure taxonomy of the service: undecodable uploads
//! are input errors that the caller can recover from, a broken model artifact is
//! fatal at startup, and a failing forward pass aborts a single request. A
//! low-confidence rejection is a regular [`crate::domain::Decision`] and never
//! shows up here.

use thiserror::Error;

/// Enum representing different stages of processing in the pipeline.
///
/// Used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while spooling the upload to disk.
    Spooling,
    /// Error occurred during tensor operations.
    TensorOperation,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Spooling => write!(f, "upload spooling"),
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
        }
    }
}

/// Enum representing the errors that can occur while classifying an image.
#[derive(Error, Debug)]
pub enum BanaError {
    /// The uploaded bytes could not be decoded as an image.
    #[error("input is not a decodable image")]
    InputFormat(#[source] image::ImageError),

    /// The upload's file name carries an extension outside the accepted set.
    #[error("unsupported file extension '{extension}', expected one of: {accepted}")]
    UnsupportedExtension {
        /// The rejected extension (lower-cased, may be empty).
        extension: String,
        /// Comma separated list of accepted extensions.
        accepted: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// The model artifact could not be loaded.
    #[error("failed to load model '{model_path}': {reason}{suggestion}")]
    ModelLoad {
        /// Path of the model artifact.
        model_path: String,
        /// Why the load failed.
        reason: String,
        /// Optional hint, already formatted with a leading separator.
        suggestion: String,
        /// The underlying error, when there is one.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error occurred during the forward pass.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The model produced something that is not a valid probability vector.
    #[error("invalid model output: {message}")]
    InvalidOutput {
        /// A message describing what was wrong with the output.
        message: String,
    },

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// A plain message error used as the source of wrapped errors that have no
/// underlying cause of their own.
#[derive(Debug, Clone)]
pub struct OpaqueError(pub String);

impl std::fmt::Display for OpaqueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for OpaqueError {}

impl From<image::ImageError> for BanaError {
    fn from(error: image::ImageError) -> Self {
        Self::InputFormat(error)
    }
}

impl From<crate::core::config::ConfigError> for BanaError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
