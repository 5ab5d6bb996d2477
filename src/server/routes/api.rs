//! JSON API under `/api/v1`.

use super::{read_upload, run_classification};
use crate::domain::{BananaVariety, CATALOG, Decision, VarietyInfo};
use crate::server::error::ApiError;
use crate::server::render::REJECTION_MESSAGE;
use crate::server::state::AppState;
use axum::extract::{Multipart, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classify", post(classify))
        .route("/labels", get(labels))
        .route("/varieties", get(varieties))
}

#[derive(Debug, Serialize)]
pub struct LabelProbability {
    pub label: BananaVariety,
    pub probability: f32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassifyResponse {
    Accepted {
        label: BananaVariety,
        index: usize,
        confidence: f32,
        confidence_percent: f32,
        probabilities: Vec<LabelProbability>,
    },
    Rejected { message: &'static str },
}

impl From<Decision> for ClassifyResponse {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted(result) => Self::Accepted {
                label: result.label,
                index: result.index,
                confidence: result.confidence,
                confidence_percent: result.confidence_percent(),
                probabilities: result
                    .probabilities
                    .iter()
                    .map(|(label, probability)| LabelProbability { label, probability })
                    .collect(),
            },
            Decision::Rejected => Self::Rejected {
                message: REJECTION_MESSAGE,
            },
        }
    }
}

/// POST /api/v1/classify
///
/// A rejection is a normal `200` answer. Unreadable uploads are `400` and
/// inference failures `500`, both in the error envelope.
#[tracing::instrument(name = "POST /api/v1/classify", skip_all)]
async fn classify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let upload = read_upload(&mut multipart).await?;
    let decision = run_classification(&state, upload).await?;
    Ok(Json(decision.into()))
}

#[tracing::instrument(name = "GET /api/v1/labels")]
async fn labels() -> Json<Vec<String>> {
    Json(BananaVariety::display_names())
}

#[tracing::instrument(name = "GET /api/v1/varieties")]
async fn varieties() -> Json<&'static [VarietyInfo]> {
    Json(&CATALOG[..])
}
