//! Configuration error types and validation traits.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a model path does not exist.
    #[error("model path does not exist: {path}")]
    ModelPathNotFound { path: std::path::PathBuf },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a configuration file could not be read or parsed.
    #[error("failed to read configuration file {path}: {message}")]
    FileError {
        path: std::path::PathBuf,
        message: String,
    },
}

/// A trait for validating configuration parameters.
///
/// Implementors provide `validate` and `get_defaults`; the remaining methods are
/// reusable checks for the fields the classifier and server configurations share.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates a model path.
    ///
    /// This method checks that the model path exists and is a file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to validate.
    fn validate_model_path(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            Err(ConfigError::ModelPathNotFound {
                path: path.to_path_buf(),
            })
        } else if !path.is_file() {
            Err(ConfigError::InvalidConfig {
                message: format!("Model path is not a file: {}", path.display()),
            })
        } else {
            Ok(())
        }
    }

    /// Validates image dimensions.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Image dimensions must be positive".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a confidence threshold.
    ///
    /// The threshold is compared with a strict `>`, so a value of 1.0 would
    /// reject every prediction and is refused.
    fn validate_confidence_threshold(&self, threshold: f32) -> Result<(), ConfigError> {
        if !threshold.is_finite() || !(0.0..1.0).contains(&threshold) {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "Confidence threshold must be in [0.0, 1.0), got {threshold}"
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates thread count.
    fn validate_thread_count(&self, thread_count: usize) -> Result<(), ConfigError> {
        const MAX_REASONABLE_THREADS: usize = 256;

        if thread_count == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Thread count must be greater than 0".to_string(),
            })
        } else if thread_count > MAX_REASONABLE_THREADS {
            Err(ConfigError::InvalidConfig {
                message: format!(
                    "Thread count {thread_count} exceeds reasonable maximum of {MAX_REASONABLE_THREADS}"
                ),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fields;

    impl ConfigValidator for Fields {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Fields
        }
    }

    #[test]
    fn test_confidence_threshold_bounds() {
        let fields = Fields::get_defaults();
        assert!(fields.validate_confidence_threshold(0.0).is_ok());
        assert!(fields.validate_confidence_threshold(0.85).is_ok());
        assert!(fields.validate_confidence_threshold(1.0).is_err());
        assert!(fields.validate_confidence_threshold(-0.1).is_err());
        assert!(fields.validate_confidence_threshold(f32::NAN).is_err());
    }

    #[test]
    fn test_missing_model_path() {
        let fields = Fields;
        let err = fields
            .validate_model_path(Path::new("does/not/exist.onnx"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ModelPathNotFound { .. }));
    }

    #[test]
    fn test_thread_count_limits() {
        let fields = Fields;
        assert!(fields.validate_thread_count(0).is_err());
        assert!(fields.validate_thread_count(4).is_ok());
        assert!(matches!(
            fields.validate_thread_count(1024),
            Err(ConfigError::InvalidConfig { .. })
        ));
    }
}
