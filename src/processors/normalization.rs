//! Image normalization utilities.
//!
//! This module turns resized RGB images into the `f32` tensor a classifier was
//! trained on. The arithmetic is the usual `value * alpha + beta` per channel,
//! with `alpha = scale / std` and `beta = -mean / std`; the [`Preprocessing`]
//! presets name the parameter sets of the model families we ship.

use crate::core::{BanaError, Tensor4D};
use crate::processors::types::ChannelOrder;
use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Named preprocessing contracts.
///
/// Using the wrong preset does not raise an error, it silently degrades every
/// prediction. The preset must match the model family the artifact was trained
/// with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preprocessing {
    /// Keras `efficientnet_v2.preprocess_input`.
    ///
    /// The network rescales internally, so pixels are passed through unchanged
    /// as `f32` in `[0, 255]`, laid out NHWC.
    #[default]
    EfficientNetV2,
    /// ImageNet mean/std normalization on `[0, 1]` pixels, laid out NCHW.
    ImageNet,
    /// Explicit parameters for a substituted model.
    Custom {
        /// Multiplier applied before mean/std (e.g. `1/255`).
        scale: f32,
        /// Per-channel mean in RGB order.
        mean: [f32; 3],
        /// Per-channel standard deviation in RGB order.
        std: [f32; 3],
        /// Tensor layout expected by the model.
        order: ChannelOrder,
    },
}

impl Preprocessing {
    /// Returns the tensor layout this preset produces.
    pub fn channel_order(&self) -> ChannelOrder {
        match self {
            Preprocessing::EfficientNetV2 => ChannelOrder::HWC,
            Preprocessing::ImageNet => ChannelOrder::CHW,
            Preprocessing::Custom { order, .. } => *order,
        }
    }

    /// Builds the normalizer implementing this preset.
    pub fn normalizer(&self) -> Result<NormalizeImage, BanaError> {
        match self {
            Preprocessing::EfficientNetV2 => NormalizeImage::new(
                Some(1.0),
                Some(vec![0.0, 0.0, 0.0]),
                Some(vec![1.0, 1.0, 1.0]),
                Some(ChannelOrder::HWC),
            ),
            Preprocessing::ImageNet => NormalizeImage::new(
                Some(1.0 / 255.0),
                Some(vec![0.485, 0.456, 0.406]),
                Some(vec![0.229, 0.224, 0.225]),
                Some(ChannelOrder::CHW),
            ),
            Preprocessing::Custom {
                scale,
                mean,
                std,
                order,
            } => NormalizeImage::new(
                Some(*scale),
                Some(mean.to_vec()),
                Some(std.to_vec()),
                Some(*order),
            ),
        }
    }
}

/// Normalizes images for classification.
///
/// This struct encapsulates the parameters needed to normalize images,
/// including scaling factors, offsets, and channel ordering.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std)
    pub alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std)
    pub beta: Vec<f32>,
    /// Channel ordering (CHW or HWC)
    pub order: ChannelOrder,
}

impl NormalizeImage {
    /// Creates a new NormalizeImage instance with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `scale` - Optional scaling factor (defaults to 1.0/255.0)
    /// * `mean` - Optional mean values for each channel (defaults to [0.485, 0.456, 0.406])
    /// * `std` - Optional standard deviation values for each channel (defaults to [0.229, 0.224, 0.225])
    /// * `order` - Optional channel ordering (defaults to CHW)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Scale is less than or equal to 0
    /// * Mean or std vectors don't have exactly 3 elements
    /// * Any standard deviation value is less than or equal to 0
    pub fn new(
        scale: Option<f32>,
        mean: Option<Vec<f32>>,
        std: Option<Vec<f32>>,
        order: Option<ChannelOrder>,
    ) -> Result<Self, BanaError> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or_else(|| vec![0.485, 0.456, 0.406]);
        let std = std.unwrap_or_else(|| vec![0.229, 0.224, 0.225]);
        let order = order.unwrap_or(ChannelOrder::CHW);

        if scale <= 0.0 {
            return Err(BanaError::config_error("Scale must be greater than 0"));
        }

        if mean.len() != 3 {
            return Err(BanaError::config_error(
                "Mean must have exactly 3 elements for RGB",
            ));
        }

        if std.len() != 3 {
            return Err(BanaError::config_error(
                "Std must have exactly 3 elements for RGB",
            ));
        }

        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(BanaError::config_error(format!(
                    "Standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }

        let alpha: Vec<f32> = std.iter().map(|s| scale / s).collect();
        let beta: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| -m / s).collect();

        let normalizer = Self { alpha, beta, order };
        normalizer.validate_config()?;
        Ok(normalizer)
    }

    /// Validates the configuration of the NormalizeImage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Alpha or beta vectors don't have exactly 3 elements
    /// * Any alpha or beta value is not finite
    pub fn validate_config(&self) -> Result<(), BanaError> {
        if self.alpha.len() != 3 || self.beta.len() != 3 {
            return Err(BanaError::config_error(
                "Alpha and beta must have exactly 3 elements for RGB",
            ));
        }

        for (i, &alpha) in self.alpha.iter().enumerate() {
            if !alpha.is_finite() {
                return Err(BanaError::config_error(format!(
                    "Alpha value at index {i} is not finite: {alpha}"
                )));
            }
        }

        for (i, &beta) in self.beta.iter().enumerate() {
            if !beta.is_finite() {
                return Err(BanaError::config_error(format!(
                    "Beta value at index {i} is not finite: {beta}"
                )));
            }
        }

        Ok(())
    }

    /// Writes one normalized image into `dst`, which holds exactly
    /// `3 * height * width` values.
    fn write_image(&self, rgb_img: &RgbImage, dst: &mut [f32]) {
        let (width, height) = rgb_img.dimensions();
        let (width, height) = (width as usize, height as usize);

        match self.order {
            ChannelOrder::CHW => {
                for (x, y, pixel) in rgb_img.enumerate_pixels() {
                    let (x, y) = (x as usize, y as usize);
                    for c in 0..3 {
                        let dst_idx = c * height * width + y * width + x;
                        dst[dst_idx] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
                    }
                }
            }
            ChannelOrder::HWC => {
                for (x, y, pixel) in rgb_img.enumerate_pixels() {
                    let (x, y) = (x as usize, y as usize);
                    for c in 0..3 {
                        let dst_idx = y * width * 3 + x * 3 + c;
                        dst[dst_idx] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
                    }
                }
            }
        }
    }

    /// Tensor shape for a batch of `batch_size` images of the given size.
    fn batch_shape(&self, batch_size: usize, height: u32, width: u32) -> [usize; 4] {
        let (h, w) = (height as usize, width as usize);
        match self.order {
            ChannelOrder::CHW => [batch_size, 3, h, w],
            ChannelOrder::HWC => [batch_size, h, w, 3],
        }
    }

    /// Normalizes a single image and returns it as a batch-of-one 4D tensor.
    pub fn normalize_to(&self, img: RgbImage) -> Result<Tensor4D, BanaError> {
        self.normalize_batch_to(vec![img])
    }

    /// Normalizes a batch of images and returns them as a 4D tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Images in the batch don't all have the same dimensions
    pub fn normalize_batch_to(&self, rgb_imgs: Vec<RgbImage>) -> Result<Tensor4D, BanaError> {
        if rgb_imgs.is_empty() {
            return Ok(ndarray::Array4::zeros((0, 0, 0, 0)));
        }

        let batch_size = rgb_imgs.len();

        let (width, height) = rgb_imgs[0].dimensions();
        for (i, img) in rgb_imgs.iter().enumerate() {
            let (w, h) = img.dimensions();
            if w != width || h != height {
                return Err(BanaError::invalid_input(format!(
                    "All images in batch must have the same dimensions. Image 0: {width}x{height}, Image {i}: {w}x{h}"
                )));
            }
        }

        let img_size = 3 * height as usize * width as usize;
        let mut result = vec![0.0f32; batch_size * img_size];

        if batch_size <= 1 {
            // Avoid rayon overhead for single-image batches
            self.write_image(&rgb_imgs[0], &mut result[..img_size]);
        } else {
            result
                .par_chunks_mut(img_size)
                .zip(rgb_imgs.par_iter())
                .for_each(|(batch_slice, rgb_img)| self.write_image(rgb_img, batch_slice));
        }

        let shape = self.batch_shape(batch_size, height, width);
        ndarray::Array4::from_shape_vec(shape, result).map_err(|e| {
            BanaError::tensor_operation(
                &format!(
                    "Failed to create {:?} normalization tensor for {batch_size} image(s) of {width}x{height}",
                    self.order
                ),
                e,
            )
        })
    }
}
