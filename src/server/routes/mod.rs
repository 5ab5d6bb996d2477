pub mod api;
pub mod health;
pub mod pages;

use super::error::ApiError;
use super::session::{SessionHandle, session_cookie};
use super::state::AppState;
use crate::domain::Decision;
use axum::body::Bytes;
use axum::extract::Multipart;
use axum::http::header;
use axum::response::Response;

/// Name of the multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "image";

/// One uploaded file.
#[derive(Debug)]
pub(crate) struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

/// Reads the image field out of a multipart body. Other fields are skipped.
pub(crate) async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // Browsers send an empty file name when nothing was picked.
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        let bytes = field.bytes().await?;
        return Ok(Upload { file_name, bytes });
    }
    Err(ApiError::bad_request(format!(
        "missing multipart field `{UPLOAD_FIELD}`"
    )))
}

/// Classifies an upload on the blocking pool.
pub(crate) async fn run_classification(
    state: &AppState,
    upload: Upload,
) -> Result<Decision, ApiError> {
    let pipeline = state.pipeline.clone();
    let decision = tokio::task::spawn_blocking(move || {
        pipeline.classify_upload(upload.file_name.as_deref(), &upload.bytes)
    })
    .await??;
    Ok(decision)
}

/// Adds the session cookie to a response for a session created by it.
pub(crate) fn with_session(mut response: Response, session: SessionHandle) -> Response {
    if session.is_new {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, session_cookie(session.id));
    }
    response
}
