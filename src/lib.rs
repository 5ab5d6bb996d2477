//! # BanaClass
//!
//! Banana variety classification backed by an EfficientNetV2-S ONNX model.
//!
//! An uploaded image is decoded to RGB, resized to 224x224, normalized and
//! run through the model as a batch of one. The softmax output covers five
//! varieties (Pisang Ambon, Cavendish, Genderuwo, Kepok and Tanduk). A
//! prediction is accepted only when its top probability is strictly above
//! the confidence threshold (0.85 by default); otherwise the image is
//! rejected as probably not a banana.
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, constants and the ONNX Runtime engine
//! * [`domain`] - Varieties, predictions and the static catalog content
//! * [`models`] - The banana classifier and its builder
//! * [`pipeline`] - Upload handling, classification and statistics
//! * [`processors`] - Normalization, top-k ranking and the confidence gate
//! * [`server`] - The axum web application
//! * [`utils`] - Image decoding and loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use banaclass::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig::new("models/banaclass.onnx");
//! let pipeline = InferencePipeline::from_config(config)?;
//!
//! let image = load_image(Path::new("pisang.jpg"))?;
//! match pipeline.classify_image(image)? {
//!     Decision::Accepted(result) => {
//!         println!("{} ({:.2}%)", result.label, result.confidence_percent());
//!     }
//!     Decision::Rejected => {
//!         println!("not recognised as a banana");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust,no_run
//! use banaclass::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: ClassifierConfig = serde_json::from_str(r#"
//! {
//!   "model_path": "models/versi3.onnx",
//!   "confidence_threshold": 0.9,
//!   "session_pool_size": 2
//! }
//! "#)?;
//!
//! let pipeline = InferencePipeline::from_config(config)?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod models;

pub mod pipeline;
pub mod processors;
pub mod server;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use banaclass::prelude::*;
/// ```
///
/// Included items cover the common path from a configuration to a decision.
/// For advanced customization (custom inference engines, processors, the web
/// server), import directly from the respective modules.
pub mod prelude {
    // Pipeline (essential)
    pub use crate::core::config::ClassifierConfig;
    pub use crate::pipeline::{InferencePipeline, PipelineStats};

    // Results
    pub use crate::domain::{BananaVariety, Decision, PredictionResult, ProbabilityVector};

    // Error Handling (essential)
    pub use crate::core::{BanaError, BanaResult};

    // Image Utility (minimal)
    pub use crate::utils::{load_image, load_images_batch};
}
