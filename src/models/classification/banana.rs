//! Banana Variety Classification Model
//!
//! This module wraps the EfficientNetV2-S banana classifier: it resizes RGB
//! images to the model input, normalizes them into a batch tensor, runs the
//! forward pass and gates the softmax output into accept/reject decisions.

use crate::core::config::{ClassifierConfig, ConfigValidator, OrtSessionConfig};
use crate::core::inference::OrtInfer;
use crate::core::traits::InferenceEngine;
use crate::core::{BanaError, BanaResult, Tensor2D, Tensor4D};
use crate::domain::{BananaVariety, Decision, ProbabilityVector};
use crate::processors::{
    ConfidenceGate, NormalizeImage, Preprocessing, ResizeFilter, Topk, TopkResult,
};
use image::{RgbImage, imageops::FilterType};
use std::path::PathBuf;
use tracing::debug;

/// Pure banana classifier implementation.
///
/// The model is opaque; everything it needs from the outside world is an
/// [`InferenceEngine`] that maps an input batch to a `(batch, 5)` score tensor.
#[derive(Debug)]
pub struct BananaClassifier {
    /// Inference engine, ONNX Runtime in production
    inference: Box<dyn InferenceEngine>,
    /// Image normalizer for preprocessing
    normalizer: NormalizeImage,
    /// Top-k processor for rankings
    topk_processor: Topk,
    /// Accept/reject threshold
    gate: ConfidenceGate,
    /// Input shape (height, width)
    input_shape: (u32, u32),
    /// Resizing filter
    resize_filter: FilterType,
}

impl BananaClassifier {
    /// Creates a new classifier from its parts.
    pub fn new(
        inference: Box<dyn InferenceEngine>,
        normalizer: NormalizeImage,
        gate: ConfidenceGate,
        input_shape: (u32, u32),
        resize_filter: FilterType,
    ) -> Self {
        Self {
            inference,
            normalizer,
            topk_processor: Topk::from_class_names(BananaVariety::display_names()),
            gate,
            input_shape,
            resize_filter,
        }
    }

    /// Name of the underlying model.
    pub fn model_name(&self) -> &str {
        self.inference.model_name()
    }

    /// Description of the underlying inference engine.
    pub fn engine_info(&self) -> String {
        self.inference.engine_info()
    }

    /// The acceptance threshold in use.
    pub fn confidence_threshold(&self) -> f32 {
        self.gate.threshold()
    }

    /// Preprocesses images for classification.
    ///
    /// # Arguments
    ///
    /// * `images` - Input images to preprocess
    ///
    /// # Returns
    ///
    /// Preprocessed batch tensor
    pub fn preprocess(&self, images: Vec<RgbImage>) -> BanaResult<Tensor4D> {
        if images.is_empty() {
            return Err(BanaError::invalid_input("no images to classify"));
        }

        let (height, width) = self.input_shape;
        let resized_images: Vec<RgbImage> = images
            .into_iter()
            .map(|img| {
                if img.dimensions() == (width, height) {
                    img
                } else {
                    image::imageops::resize(&img, width, height, self.resize_filter)
                }
            })
            .collect();

        self.normalizer.normalize_batch_to(resized_images)
    }

    /// Runs inference on the preprocessed batch.
    ///
    /// # Returns
    ///
    /// Model predictions as a 2D tensor (batch_size x num_classes)
    pub fn infer(&self, batch_tensor: &Tensor4D) -> BanaResult<Tensor2D> {
        debug!(shape = ?batch_tensor.shape(), model = self.model_name(), "running forward pass");
        self.inference.infer(batch_tensor)
    }

    /// Validates each output row as a probability vector.
    pub fn probabilities(
        &self,
        predictions: &Tensor2D,
        expected_batch: usize,
    ) -> BanaResult<Vec<ProbabilityVector>> {
        if predictions.nrows() != expected_batch {
            return Err(BanaError::invalid_output(format!(
                "expected {expected_batch} prediction rows, got {}",
                predictions.nrows()
            )));
        }

        predictions
            .outer_iter()
            .map(|row| match row.as_slice() {
                Some(values) => ProbabilityVector::try_from_slice(values),
                None => ProbabilityVector::try_from_slice(&row.to_vec()),
            })
            .collect()
    }

    /// Postprocesses model predictions into decisions.
    pub fn postprocess(
        &self,
        predictions: &Tensor2D,
        expected_batch: usize,
    ) -> BanaResult<Vec<Decision>> {
        Ok(self
            .probabilities(predictions, expected_batch)?
            .into_iter()
            .map(|probs| self.gate.decide(probs))
            .collect())
    }

    /// Performs complete forward pass: preprocess -> infer -> postprocess.
    pub fn forward(&self, images: Vec<RgbImage>) -> BanaResult<Vec<Decision>> {
        let batch = images.len();
        let batch_tensor = self.preprocess(images)?;
        let predictions = self.infer(&batch_tensor)?;
        self.postprocess(&predictions, batch)
    }

    /// Classifies a single image.
    pub fn classify(&self, image: RgbImage) -> BanaResult<Decision> {
        self.forward(vec![image])?
            .pop()
            .ok_or_else(|| BanaError::invalid_output("model returned no prediction"))
    }

    /// Ranks the varieties of one probability vector, best first.
    pub fn rank(&self, probabilities: &ProbabilityVector, k: usize) -> BanaResult<TopkResult> {
        self.topk_processor
            .process_single(probabilities.as_slice(), k)
    }
}

/// Builder for the banana classifier.
#[derive(Debug, Default)]
pub struct BananaClassifierBuilder {
    config: ClassifierConfig,
}

impl BananaClassifierBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Sets the model path.
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.model_path = path.into();
        self
    }

    /// Sets the session pool size for ONNX Runtime.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.config.session_pool_size = size;
        self
    }

    /// Sets the input image shape.
    pub fn input_shape(mut self, shape: (u32, u32)) -> Self {
        self.config.input_shape = shape;
        self
    }

    /// Sets the resizing filter.
    pub fn resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.config.resize_filter = filter;
        self
    }

    /// Sets the preprocessing contract.
    pub fn preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.config.preprocessing = preprocessing;
        self
    }

    /// Sets the confidence threshold.
    pub fn confidence_threshold(mut self, threshold: f32) -> Self {
        self.config.confidence_threshold = threshold;
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.config.ort_session = Some(config);
        self
    }

    /// Returns the configuration collected so far.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Loads the ONNX model and builds the classifier.
    pub fn build(self) -> BanaResult<BananaClassifier> {
        self.config.validate()?;
        let inference = OrtInfer::from_config(&self.config)?;
        self.build_with_engine(Box::new(inference))
    }

    /// Builds the classifier around an already constructed engine.
    pub fn build_with_engine(
        self,
        inference: Box<dyn InferenceEngine>,
    ) -> BanaResult<BananaClassifier> {
        self.config.validate()?;
        let normalizer = self.config.preprocessing.normalizer()?;
        let gate = ConfidenceGate::new(self.config.confidence_threshold)?;

        Ok(BananaClassifier::new(
            inference,
            normalizer,
            gate,
            self.config.input_shape,
            self.config.resize_filter.into(),
        ))
    }
}
