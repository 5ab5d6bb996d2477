//! Trait definitions for the classification pipeline.
//!
//! The classifier talks to its model only through [`InferenceEngine`], which
//! keeps the ONNX Runtime backend swappable and lets tests script model output
//! without a model file.

use crate::core::batch::{Tensor2D, Tensor4D};
use crate::core::errors::BanaResult;
use std::fmt::Debug;

/// Trait for the model forward pass.
///
/// Implementations must be callable from several threads at once; the ONNX
/// Runtime engine serializes access to each session internally.
pub trait InferenceEngine: Send + Sync + Debug {
    /// Runs a batch of preprocessed images through the model.
    ///
    /// # Arguments
    ///
    /// * `input` - Batched input tensor in the layout the model expects
    ///
    /// # Returns
    ///
    /// A `(batch, classes)` score tensor, one row per input image
    fn infer(&self, input: &Tensor4D) -> BanaResult<Tensor2D>;

    /// Name of the loaded model, used in logs and errors.
    fn model_name(&self) -> &str;

    /// Get information about the inference engine.
    ///
    /// # Returns
    ///
    /// String describing the inference engine (model type, backend, etc.)
    fn engine_info(&self) -> String {
        format!("InferenceEngine[{}]", self.model_name())
    }
}
