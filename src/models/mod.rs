//! Model implementations for the classifier.
//!
//! Models own their preprocessing and postprocessing and talk to the runtime
//! only through [`crate::core::InferenceEngine`].

pub mod classification;

pub use classification::*;
