//! Error types for the classification pipeline.
//!
//! # Usage
//!
//! ```rust
//! use banaclass::core::errors::{BanaError, ProcessingStage};
//!
//! let error = BanaError::tensor_operation(
//!     "Failed to reshape tensor for batch processing",
//!     std::io::Error::new(std::io::ErrorKind::InvalidData, "Invalid tensor shape"),
//! );
//! assert!(!error.is_input_error());
//!
//! let config_error = BanaError::config_error("Missing required model path");
//! assert!(config_error.to_string().contains("model path"));
//! ```

pub mod constructors;
pub mod types;

pub use types::{BanaError, OpaqueError, ProcessingStage};

/// Convenient result alias for classification operations.
pub type BanaResult<T> = Result<T, BanaError>;
