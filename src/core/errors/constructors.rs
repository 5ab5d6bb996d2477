//! Error constructor utilities for the classification pipeline.
//!
//! These helpers keep call sites short and make sure every wrapped error keeps
//! its source attached.

use super::types::{BanaError, OpaqueError, ProcessingStage};

impl BanaError {
    #[inline]
    fn processing_with_context(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a BanaError for tensor operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn tensor_operation(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::TensorOperation, context, error)
    }

    /// Creates a BanaError for a failure while writing an upload to its spool file.
    pub fn spooling(context: &str, error: std::io::Error) -> Self {
        Self::processing_with_context(ProcessingStage::Spooling, context, error)
    }

    /// Creates a BanaError for a failed forward pass.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model that failed.
    /// * `context` - What the engine was doing when it failed.
    /// * `error` - The underlying error that caused this error.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a BanaError for a failed forward pass without an underlying error value.
    pub fn inference_message(model_name: &str, context: &str) -> Self {
        Self::inference_error(model_name, context, OpaqueError(context.to_string()))
    }

    /// Creates a BanaError for a model that could not be loaded.
    ///
    /// # Arguments
    ///
    /// * `model_path` - Path of the model artifact.
    /// * `reason` - Why loading failed.
    /// * `suggestion` - Optional hint for the operator.
    /// * `source` - Optional underlying error.
    pub fn model_load_error(
        model_path: impl AsRef<std::path::Path>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let suggestion = suggestion
            .map(|s| format!("; suggested fix: {s}"))
            .unwrap_or_default();
        Self::ModelLoad {
            model_path: model_path.as_ref().display().to_string(),
            reason: reason.into(),
            suggestion,
            source: source.map(|e| Box::new(e) as _),
        }
    }

    /// Creates a BanaError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a BanaError for a model output that is not a probability vector.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            message: message.into(),
        }
    }

    /// Creates a BanaError for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Returns true when the error was caused by the caller's input rather than
    /// by the service. Such errors are recoverable by re-uploading.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputFormat(_) | Self::UnsupportedExtension { .. } | Self::InvalidInput { .. }
        )
    }
}
