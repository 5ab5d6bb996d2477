//! Types used in image processing operations
//!
//! This module defines the enums that describe how an image is turned into the
//! tensor layout a model expects.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Specifies the order of channels in an image tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch)
    CHW,
    /// Height, Width, Channel order (common in TensorFlow)
    HWC,
}

/// Resampling filter used when resizing an image to the model input shape.
///
/// Mirrors [`FilterType`] so it can live in serialized configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest-neighbour sampling, the default of Keras' `load_img`.
    #[default]
    Nearest,
    /// Bilinear sampling.
    Triangle,
    /// Bicubic sampling.
    CatmullRom,
    /// Gaussian sampling.
    Gaussian,
    /// Lanczos with window 3.
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_filter_serde_names() {
        let filter: ResizeFilter = serde_json::from_str("\"lanczos3\"").unwrap();
        assert_eq!(filter, ResizeFilter::Lanczos3);
        assert_eq!(serde_json::to_string(&ResizeFilter::Nearest).unwrap(), "\"nearest\"");
    }

    #[test]
    fn test_resize_filter_conversion() {
        assert_eq!(FilterType::from(ResizeFilter::Nearest), FilterType::Nearest);
        assert_eq!(FilterType::from(ResizeFilter::Triangle), FilterType::Triangle);
    }
}
