//! The classification pipeline module.
//!
//! This module ties upload handling, the classifier and the confidence gate
//! together, and keeps running statistics about what it decided.
//!
//! The model is loaded exactly once per process. Applications that build the
//! pipeline eagerly (like the web server) hold it in an `Arc`; library callers
//! can use [`shared_pipeline`] for lazy load-once access instead.

mod inference;
pub mod stats;

pub use inference::InferencePipeline;
pub use stats::{Outcome, PipelineStats, StatsManager};

use crate::core::BanaResult;
use crate::core::config::ClassifierConfig;
use once_cell::sync::OnceCell;

static SHARED_PIPELINE: OnceCell<InferencePipeline> = OnceCell::new();

/// Returns the process-wide pipeline, loading the model on first use.
///
/// Only the configuration of the first successful call is used; later calls
/// get the already loaded pipeline whatever they pass. A failed load is not
/// cached, so the next call tries again.
pub fn shared_pipeline(
    config: impl FnOnce() -> ClassifierConfig,
) -> BanaResult<&'static InferencePipeline> {
    SHARED_PIPELINE.get_or_try_init(|| InferencePipeline::from_config(config()))
}
