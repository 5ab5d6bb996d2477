//! Helpers for working directly with ONNX Runtime sessions.

use crate::core::errors::BanaError;
use ort::logging::LogLevel;
use ort::session::Session;
use std::path::Path;

/// Loads a single ONNX Runtime session with default settings.
///
/// Use [`super::OrtInfer`] for pooled, configured engines; this is for callers
/// that want to inspect a model (inputs, outputs, metadata) directly.
pub fn load_session(model_path: impl AsRef<Path>) -> Result<Session, BanaError> {
    let path = model_path.as_ref();
    let session = Session::builder()
        .and_then(|b| b.with_log_level(LogLevel::Error))
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| {
            BanaError::model_load_error(
                path,
                "failed to create ONNX session",
                Some("verify model file exists and is readable"),
                Some(e),
            )
        })?;
    Ok(session)
}
