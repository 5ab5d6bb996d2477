//! Configuration of the banana classifier.

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_INPUT_SHAPE, DEFAULT_SESSION_POOL_SIZE,
};
use crate::processors::{Preprocessing, ResizeFilter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Path the model is loaded from when nothing else is configured.
pub const DEFAULT_MODEL_PATH: &str = "models/banaclass.onnx";

/// Everything needed to load the model and turn its output into a decision.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "model_path": "models/versi3.onnx", "confidence_threshold": 0.9 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Path to the ONNX model artifact.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Name used in logs and errors. Defaults to the model file stem.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Model input size as `(height, width)`.
    #[serde(default = "default_input_shape")]
    pub input_shape: (u32, u32),
    /// Predictions are accepted only above this value.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default)]
    pub preprocessing: Preprocessing,
    #[serde(default)]
    pub resize_filter: ResizeFilter,
    /// Number of ONNX Runtime sessions kept for concurrent requests.
    #[serde(default = "default_session_pool_size")]
    pub session_pool_size: usize,
    #[serde(default)]
    pub ort_session: Option<OrtSessionConfig>,
    /// Input tensor name. Discovered from the model when unset.
    #[serde(default)]
    pub input_name: Option<String>,
    /// Output tensor name. Discovered from the model when unset.
    #[serde(default)]
    pub output_name: Option<String>,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}
fn default_input_shape() -> (u32, u32) {
    DEFAULT_INPUT_SHAPE
}
fn default_confidence_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}
fn default_session_pool_size() -> usize {
    DEFAULT_SESSION_POOL_SIZE
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            model_name: None,
            input_shape: default_input_shape(),
            confidence_threshold: default_confidence_threshold(),
            preprocessing: Preprocessing::default(),
            resize_filter: ResizeFilter::default(),
            session_pool_size: default_session_pool_size(),
            ort_session: None,
            input_name: None,
            output_name: None,
        }
    }
}

impl ClassifierConfig {
    /// Creates a default configuration for the given model file.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_error = |message: String| ConfigError::FileError {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| file_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    pub fn with_input_shape(mut self, height: u32, width: u32) -> Self {
        self.input_shape = (height, width);
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    pub fn with_resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    pub fn with_session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = size;
        self
    }

    pub fn with_ort_session(mut self, ort_session: OrtSessionConfig) -> Self {
        self.ort_session = Some(ort_session);
        self
    }

    pub fn with_io_names(mut self, input: Option<&str>, output: Option<&str>) -> Self {
        self.input_name = input.map(str::to_string);
        self.output_name = output.map(str::to_string);
        self
    }

    /// Returns the configured model name, or the model file stem.
    pub fn resolved_model_name(&self) -> String {
        self.model_name
            .clone()
            .or_else(|| {
                self.model_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown_model".to_string())
    }
}

impl ConfigValidator for ClassifierConfig {
    /// Validates the numeric parameters.
    ///
    /// The model path is checked when the model is loaded, so that a missing
    /// artifact surfaces as a model load failure.
    fn validate(&self) -> Result<(), ConfigError> {
        let (height, width) = self.input_shape;
        self.validate_image_dimensions(width, height)?;
        self.validate_confidence_threshold(self.confidence_threshold)?;
        self.validate_thread_count(self.session_pool_size)?;

        if let Some(ort) = &self.ort_session {
            if let Some(threads) = ort.intra_threads {
                self.validate_thread_count(threads)?;
            }
            if let Some(threads) = ort.inter_threads {
                self.validate_thread_count(threads)?;
            }
        }

        if let Preprocessing::Custom { std, .. } = &self.preprocessing
            && std.iter().any(|s| *s == 0.0 || !s.is_finite())
        {
            return Err(ConfigError::InvalidConfig {
                message: "preprocessing std values must be finite and non-zero".to_string(),
            });
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::ChannelOrder;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::default();
        assert_eq!(config.input_shape, (224, 224));
        assert_eq!(config.confidence_threshold, 0.85);
        assert_eq!(config.preprocessing, Preprocessing::EfficientNetV2);
        assert_eq!(config.resize_filter, ResizeFilter::Nearest);
        assert_eq!(config.resolved_model_name(), "banaclass");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(
            ClassifierConfig::default()
                .with_confidence_threshold(1.5)
                .validate()
                .is_err()
        );
        assert!(
            ClassifierConfig::default()
                .with_input_shape(0, 224)
                .validate()
                .is_err()
        );
        assert!(
            ClassifierConfig::default()
                .with_session_pool_size(0)
                .validate()
                .is_err()
        );
        assert!(matches!(
            ClassifierConfig::default()
                .with_session_pool_size(1024)
                .validate(),
            Err(ConfigError::InvalidConfig { .. })
        ));
        let custom = Preprocessing::Custom {
            scale: 1.0,
            mean: [0.0; 3],
            std: [1.0, 0.0, 1.0],
            order: ChannelOrder::CHW,
        };
        assert!(
            ClassifierConfig::default()
                .with_preprocessing(custom)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_from_file_with_partial_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model_path": "models/versi3.onnx", "confidence_threshold": 0.9, "resize_filter": "triangle"}}"#
        )
        .unwrap();

        let config = ClassifierConfig::from_file(file.path()).unwrap();
        assert_eq!(config.model_path, PathBuf::from("models/versi3.onnx"));
        assert_eq!(config.confidence_threshold, 0.9);
        assert_eq!(config.resize_filter, ResizeFilter::Triangle);
        assert_eq!(config.input_shape, (224, 224));
        assert_eq!(config.resolved_model_name(), "versi3");
    }

    #[test]
    fn test_from_file_errors() {
        let missing = ClassifierConfig::from_file("no/such/config.json").unwrap_err();
        assert!(matches!(missing, ConfigError::FileError { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"confidence_threshold": 1.0}}"#).unwrap();
        assert!(matches!(
            ClassifierConfig::from_file(file.path()),
            Err(ConfigError::InvalidConfig { .. })
        ));
    }
}
