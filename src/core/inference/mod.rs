//! Structures and helpers for ONNX Runtime inference.
//!
//! This module centralizes the low level inference engine that implements the
//! `InferenceEngine` trait used by the classifier.

pub mod ort_infer;
pub mod session;

pub use ort_infer::OrtInfer;
pub use session::load_session;
