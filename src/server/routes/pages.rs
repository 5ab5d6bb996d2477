//! The browser-facing pages.

use super::{read_upload, run_classification, with_session};
use crate::domain::Decision;
use crate::server::error::ApiError;
use crate::server::render::{
    Banner, INPUT_ERROR_MESSAGE, INTERNAL_ERROR_MESSAGE, preview_data_url,
};
use crate::server::state::AppState;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Router, routing::get};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/classify", get(home).post(classify))
        .route("/varieties", get(varieties))
        .route("/about", get(about))
}

/// Upload form, plus the last accepted result of this session.
#[tracing::instrument(name = "GET /", skip_all)]
async fn home(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let session = state.sessions.resolve(&headers);
    let result = state.sessions.last_result(&session.id);
    let banners = result.as_ref().map(Banner::accepted).unwrap_or_default();
    let body = state.templates.home(&banners, result.as_ref(), None)?;
    Ok(Html(body).into_response())
}

/// Classifies the uploaded image and renders the home page with the outcome.
///
/// The uploaded image is shown back whenever it could be classified. Accepted
/// results are remembered for the session, which is created at that point,
/// and rejections forget the previous one. A failed upload leaves the session
/// untouched.
#[tracing::instrument(name = "POST /classify", skip_all)]
async fn classify(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let session = state.sessions.resolve(&headers);
    let (outcome, uploaded) = match read_upload(&mut multipart).await {
        Ok(upload) => {
            let bytes = upload.bytes.clone();
            (run_classification(&state, upload).await, Some(bytes))
        }
        Err(e) => (Err(e), None),
    };
    let preview = match &outcome {
        Ok(_) => uploaded.as_deref().and_then(preview_data_url),
        Err(_) => None,
    };

    let (status, banners, result) = match outcome {
        Ok(Decision::Accepted(result)) => {
            state.sessions.store_result(session.id, result.clone());
            (StatusCode::OK, Banner::accepted(&result), Some(result))
        }
        Ok(Decision::Rejected) => {
            state.sessions.clear_result(session.id);
            (StatusCode::OK, vec![Banner::rejected()], None)
        }
        Err(e) => {
            let message = if e.is_input_error() {
                INPUT_ERROR_MESSAGE
            } else {
                INTERNAL_ERROR_MESSAGE
            };
            (e.status(), vec![Banner::error(message)], None)
        }
    };

    let stored = result.is_some();
    let body = state
        .templates
        .home(&banners, result.as_ref(), preview.as_deref())?;
    let response = (status, Html(body)).into_response();
    Ok(if stored {
        with_session(response, session)
    } else {
        response
    })
}

#[tracing::instrument(name = "GET /varieties", skip_all)]
async fn varieties(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(state.templates.varieties()?))
}

#[tracing::instrument(name = "GET /about", skip_all)]
async fn about(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(state.templates.about()?))
}
