//! Constants used throughout the classification pipeline.
//!
//! These are the fixed contract of the shipped model. [`crate::core::config::ClassifierConfig`]
//! uses them as defaults and allows overriding the threshold and input shape
//! for a re-trained or substituted model.

/// Number of banana varieties the model distinguishes.
///
/// The model's probability vector has exactly this many entries.
pub const NUM_CLASSES: usize = 5;

/// The default confidence threshold.
///
/// A prediction is accepted only when its confidence is strictly greater
/// than this value; anything at or below it is rejected as "not a banana".
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.85;

/// The default input shape (height, width) for classification.
pub const DEFAULT_INPUT_SHAPE: (u32, u32) = (224, 224);

/// Tolerance used when checking that a probability vector sums to one.
pub const PROBABILITY_SUM_TOLERANCE: f32 = 1e-3;

/// File extensions accepted for uploads (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// The default session pool size for ONNX Runtime.
pub const DEFAULT_SESSION_POOL_SIZE: usize = 1;

/// The default maximum upload size in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The default idle time after which a browser session is dropped.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// The default bind address of the HTTP server.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8501";

/// Name of the cookie carrying the browser session id.
pub const SESSION_COOKIE_NAME: &str = "banaclass_session";

/// Batches larger than this are decoded in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4;
