use super::render::Templates;
use super::session::SessionStore;
use crate::core::config::ServerConfig;
use crate::pipeline::InferencePipeline;
use std::sync::Arc;

pub type AppState = Arc<State>;

/// Everything the request handlers share.
#[derive(Debug)]
pub struct State {
    pub pipeline: Arc<InferencePipeline>,
    pub sessions: SessionStore,
    pub templates: Templates,
    pub config: ServerConfig,
}

impl State {
    /// Builds the server state around an already loaded pipeline.
    pub fn new(
        pipeline: Arc<InferencePipeline>,
        config: ServerConfig,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            pipeline,
            sessions: SessionStore::new(config.session_ttl()),
            templates: Templates::new()?,
            config,
        })
    }
}
