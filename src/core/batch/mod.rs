//! Tensor type aliases shared by the preprocessing and inference code.

/// Two-dimensional `f32` tensor, used for `(batch, classes)` model outputs.
pub type Tensor2D = ndarray::Array2<f32>;

/// Four-dimensional `f32` tensor, used for batched image inputs.
///
/// The axis order depends on [`crate::processors::ChannelOrder`]: `(N, C, H, W)`
/// for CHW and `(N, H, W, C)` for HWC.
pub type Tensor4D = ndarray::Array4<f32>;
