use super::*;
use crate::core::config::{
    ClassifierConfig, ConfigValidator, OrtGraphOptimizationLevel, OrtSessionConfig,
};
use crate::core::errors::BanaError;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

impl OrtInfer {
    /// Creates a new OrtInfer instance with default ONNX Runtime settings and a single session.
    ///
    /// The input name is discovered from the model when `input_name` is `None`.
    pub fn new(model_path: impl AsRef<Path>, input_name: Option<&str>) -> BanaResult<Self> {
        let config = ClassifierConfig::new(model_path.as_ref())
            .with_io_names(input_name, None);
        Self::from_config(&config)
    }

    /// Creates a new OrtInfer instance from a [`ClassifierConfig`], applying ORT session
    /// configuration and constructing a session pool for concurrent predictions.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`crate::core::BanaError::ModelLoad`]: a missing
    /// file, a file ONNX Runtime cannot parse, or a model without inputs or outputs.
    pub fn from_config(config: &ClassifierConfig) -> BanaResult<Self> {
        let path = config.model_path.as_path();
        if let Err(e) = config.validate_model_path(path) {
            return Err(BanaError::model_load_error(
                path,
                e.to_string(),
                Some("export the classifier to ONNX and point --model at the file"),
                Some(e),
            ));
        }

        let pool_size = config.session_pool_size.max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let session = Self::build_session(path, config.ort_session.as_ref())?;
            sessions.push(Mutex::new(session));
        }

        let (discovered_input, discovered_output) = {
            let first = &sessions[0];
            let session = first.lock().map_err(|_| {
                BanaError::model_load_error(
                    path,
                    "session lock poisoned during load",
                    None,
                    None::<std::io::Error>,
                )
            })?;
            (
                session.inputs.first().map(|i| i.name.clone()),
                session.outputs.first().map(|o| o.name.clone()),
            )
        };

        let input_name = config
            .input_name
            .clone()
            .or(discovered_input)
            .ok_or_else(|| {
                BanaError::model_load_error(
                    path,
                    "model declares no inputs",
                    Some("verify the file is a classifier export"),
                    None::<std::io::Error>,
                )
            })?;
        if config.output_name.is_none() && discovered_output.is_none() {
            return Err(BanaError::model_load_error(
                path,
                "model declares no outputs",
                Some("verify the file is a classifier export"),
                None::<std::io::Error>,
            ));
        }

        let engine = OrtInfer {
            sessions,
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            output_name: config.output_name.clone().or(discovered_output),
            model_path: path.to_path_buf(),
            model_name: config.resolved_model_name(),
        };

        info!(
            model = %engine.model_name,
            path = %path.display(),
            pool_size,
            input = %engine.input_name,
            "loaded ONNX model"
        );
        if let Some(shape) = engine.primary_input_shape() {
            debug!(?shape, "model input shape");
        }

        Ok(engine)
    }

    fn build_session(path: &Path, ort_config: Option<&OrtSessionConfig>) -> BanaResult<Session> {
        let load_error = |e: ort::Error| {
            BanaError::model_load_error(
                path,
                "failed to create ONNX session",
                Some("check the model file and the ONNX Runtime installation"),
                Some(e),
            )
        };

        let builder = Session::builder().map_err(load_error)?;
        let builder = match ort_config {
            Some(cfg) => Self::apply_ort_config(builder, cfg),
            // Set default log level to Error to suppress ORT logs
            None => builder.with_log_level(LogLevel::Error),
        }
        .map_err(load_error)?;

        builder.commit_from_file(path).map_err(load_error)
    }

    /// Applies ORT session configuration to a session builder.
    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(level) = cfg.optimization_level {
            use OrtGraphOptimizationLevel as OG;
            let mapped = match level {
                OG::DisableAll => GraphOptimizationLevel::Disable,
                OG::Level1 => GraphOptimizationLevel::Level1,
                OG::Level2 => GraphOptimizationLevel::Level2,
                OG::Level3 => GraphOptimizationLevel::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        let log_level = match cfg.log_severity_level {
            Some(0) => LogLevel::Verbose,
            Some(1) => LogLevel::Info,
            Some(2) => LogLevel::Warning,
            Some(4) => LogLevel::Fatal,
            _ => LogLevel::Error,
        };
        builder = builder.with_log_level(log_level)?;

        #[cfg(feature = "cuda")]
        {
            builder = builder.with_execution_providers([
                ort::execution_providers::CUDAExecutionProvider::default().build(),
            ])?;
        }

        Ok(builder)
    }
}
