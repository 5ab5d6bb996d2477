//! End-to-end classification of uploaded images.

use super::stats::{Outcome, PipelineStats, StatsManager};
use crate::core::config::ClassifierConfig;
use crate::core::{BanaError, BanaResult};
use crate::domain::Decision;
use crate::models::{BananaClassifier, BananaClassifierBuilder};
use crate::utils::{check_extension, decode_upload};
use image::RgbImage;
use std::time::Instant;
use tracing::{error, info, warn};

/// Turns uploaded image bytes into a [`Decision`].
///
/// The pipeline owns the loaded classifier and is meant to be built once per
/// process and shared behind an `Arc`. All methods are blocking; async callers
/// should run them on a blocking thread.
#[derive(Debug)]
pub struct InferencePipeline {
    classifier: BananaClassifier,
    stats: StatsManager,
}

impl InferencePipeline {
    /// Wraps an already built classifier.
    pub fn new(classifier: BananaClassifier) -> Self {
        Self {
            classifier,
            stats: StatsManager::new(),
        }
    }

    /// Loads the model described by `config`.
    ///
    /// # Errors
    ///
    /// `BanaError::ModelLoad` when the model artifact is missing or unreadable,
    /// `BanaError::ConfigError` when the configuration is invalid.
    pub fn from_config(config: ClassifierConfig) -> BanaResult<Self> {
        let classifier = BananaClassifierBuilder::from_config(config).build()?;
        Ok(Self::new(classifier))
    }

    pub fn classifier(&self) -> &BananaClassifier {
        &self.classifier
    }

    /// Returns a snapshot of the pipeline counters.
    pub fn stats(&self) -> PipelineStats {
        self.stats.get_stats()
    }

    /// Classifies one uploaded file.
    ///
    /// When `file_name` is given its extension must be one of the accepted
    /// image types. The bytes are spooled to a temporary file and decoded by
    /// content, so a failed decode never reaches the model.
    pub fn classify_upload(&self, file_name: Option<&str>, bytes: &[u8]) -> BanaResult<Decision> {
        let start = Instant::now();
        let image = file_name
            .map(check_extension)
            .transpose()
            .and_then(|_| decode_upload(bytes));

        match image {
            Ok(image) => self.classify_image_since(image, start),
            Err(e) => {
                warn!(file = file_name.unwrap_or("<unnamed>"), error = %e, "rejected upload");
                self.stats
                    .record(&[Outcome::Failed], start.elapsed().as_secs_f64() * 1000.0);
                Err(e)
            }
        }
    }

    /// Classifies a decoded image.
    pub fn classify_image(&self, image: RgbImage) -> BanaResult<Decision> {
        self.classify_image_since(image, Instant::now())
    }

    fn classify_image_since(&self, image: RgbImage, start: Instant) -> BanaResult<Decision> {
        let (width, height) = image.dimensions();
        let result = self.classifier.classify(image);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(decision) => {
                self.stats.record(&[outcome_of(decision)], elapsed_ms);
                log_decision(decision, width, height, elapsed_ms);
            }
            Err(e) => {
                self.stats.record(&[Outcome::Failed], elapsed_ms);
                log_failure(e);
            }
        }
        result
    }

    /// Classifies several decoded images in one forward pass.
    ///
    /// A failing forward pass fails the whole batch.
    pub fn classify_batch(&self, images: Vec<RgbImage>) -> BanaResult<Vec<Decision>> {
        let count = images.len();
        let start = Instant::now();
        let result = self.classifier.forward(images);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(decisions) => {
                let outcomes: Vec<Outcome> = decisions.iter().map(outcome_of).collect();
                self.stats.record(&outcomes, elapsed_ms);
                info!(
                    images = count,
                    accepted = decisions.iter().filter(|d| d.is_accepted()).count(),
                    elapsed_ms,
                    "classified batch"
                );
            }
            Err(e) => {
                self.stats.record(&vec![Outcome::Failed; count], elapsed_ms);
                log_failure(e);
            }
        }
        result
    }
}

fn outcome_of(decision: &Decision) -> Outcome {
    if decision.is_accepted() {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    }
}

fn log_decision(decision: &Decision, width: u32, height: u32, elapsed_ms: f64) {
    match decision {
        Decision::Accepted(result) => info!(
            label = %result.label,
            confidence = result.confidence,
            width,
            height,
            elapsed_ms,
            "banana classified"
        ),
        Decision::Rejected => info!(
            width,
            height,
            elapsed_ms,
            "image rejected as not a banana"
        ),
    }
}

fn log_failure(e: &BanaError) {
    if e.is_input_error() {
        warn!(error = %e, "classification input rejected");
    } else {
        error!(error = %e, "classification failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::InferenceEngine;
    use crate::core::{Tensor2D, Tensor4D};
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct CountingEngine {
        row: [f32; 5],
        calls: AtomicUsize,
    }

    impl InferenceEngine for &'static CountingEngine {
        fn infer(&self, input: &Tensor4D) -> BanaResult<Tensor2D> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let batch = input.shape()[0];
            let data: Vec<f32> = (0..batch).flat_map(|_| self.row).collect();
            Ok(Tensor2D::from_shape_vec((batch, 5), data)?)
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    fn pipeline(row: [f32; 5]) -> (InferencePipeline, &'static CountingEngine) {
        let engine: &'static CountingEngine = Box::leak(Box::new(CountingEngine {
            row,
            calls: AtomicUsize::new(0),
        }));
        let classifier = BananaClassifierBuilder::new()
            .build_with_engine(Box::new(engine))
            .unwrap();
        (InferencePipeline::new(classifier), engine)
    }

    fn jpeg_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(300, 200, Rgb([230, 200, 40]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_upload_accepted() {
        let (pipeline, engine) = pipeline([0.05, 0.03, 0.02, 0.85001, 0.04999]);
        let decision = pipeline
            .classify_upload(Some("kepok.JPG"), &jpeg_bytes())
            .unwrap();

        assert_eq!(
            decision.prediction().map(|p| p.label.display_name()),
            Some("Pisang Kepok")
        );
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        let stats = pipeline.stats();
        assert_eq!((stats.total_processed, stats.accepted), (1, 1));
    }

    #[test]
    fn test_non_image_never_reaches_model() {
        let (pipeline, engine) = pipeline([0.9, 0.025, 0.025, 0.025, 0.025]);
        let err = pipeline
            .classify_upload(Some("banana.png"), b"not an image at all")
            .unwrap_err();

        assert!(matches!(err, BanaError::InputFormat(_)));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.stats().failed, 1);
    }

    #[test]
    fn test_extension_filter() {
        let (pipeline, engine) = pipeline([0.9, 0.025, 0.025, 0.025, 0.025]);
        let err = pipeline
            .classify_upload(Some("banana.gif"), &jpeg_bytes())
            .unwrap_err();
        assert!(matches!(err, BanaError::UnsupportedExtension { .. }));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);

        // Without a name only the content matters.
        assert!(pipeline.classify_upload(None, &jpeg_bytes()).is_ok());
    }

    #[test]
    fn test_rejection_is_not_an_error() {
        let (pipeline, _) = pipeline([0.21, 0.20, 0.19, 0.20, 0.20]);
        let decision = pipeline.classify_upload(None, &jpeg_bytes()).unwrap();
        assert_eq!(decision, Decision::Rejected);
        assert_eq!(pipeline.stats().rejected, 1);
    }

    #[test]
    fn test_same_image_same_decision() {
        let (pipeline, _) = pipeline([0.02, 0.9, 0.03, 0.03, 0.02]);
        let image = RgbImage::from_pixel(50, 40, Rgb([1, 2, 3]));
        let first = pipeline.classify_image(image.clone()).unwrap();
        let second = pipeline.classify_image(image).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_updates_stats() {
        let (pipeline, engine) = pipeline([0.02, 0.9, 0.03, 0.03, 0.02]);
        let images = vec![RgbImage::new(10, 10), RgbImage::new(64, 48), RgbImage::new(5, 5)];
        let decisions = pipeline.classify_batch(images).unwrap();
        assert_eq!(decisions.len(), 3);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.stats().accepted, 3);
    }
}
