use crate::pipeline::PipelineStats;
use crate::server::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::{Router, routing::get};
use serde::Serialize;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model: String,
    pub confidence_threshold: f32,
    pub stats: PipelineStats,
}

/// The model is loaded before the listener starts, so a reachable server is
/// always able to classify.
#[tracing::instrument(name = "GET /health", skip_all)]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let classifier = state.pipeline.classifier();
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        model: classifier.model_name().to_string(),
        confidence_threshold: classifier.confidence_threshold(),
        stats: state.pipeline.stats(),
    })
}
