//! JSON error responses of the HTTP API.

use crate::core::BanaError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Public code for anything the caller can fix by uploading a different file.
pub const INPUT_FORMAT: &str = "INPUT_FORMAT";
/// Public code for failures on the service side.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: &'static str,
    public_message: String,
    /// Set for server-side failures so logs and responses can be matched up.
    error_id: Option<String>,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self {
            status: StatusCode::BAD_REQUEST,
            public_code: INPUT_FORMAT,
            public_message: msg,
            error_id: None,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::error!(error_id = %id, "Internal error: {}", msg.into());
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            public_code: INTERNAL_ERROR,
            public_message: "Classification failed".to_string(),
            error_id: Some(id),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn public_code(&self) -> &'static str {
        self.public_code
    }

    /// True when the caller sent something that is not a usable image.
    pub fn is_input_error(&self) -> bool {
        self.public_code == INPUT_FORMAT
    }
}

impl From<BanaError> for ApiError {
    fn from(err: BanaError) -> Self {
        if err.is_input_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("classification task failed: {err}"))
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        let status = err.status();
        Self {
            status,
            ..Self::bad_request(format!("malformed upload: {}", err.body_text()))
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        Self::internal(format!("page rendering failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<&'a str>,
            message: &'a str,
        }

        let mut response = (
            self.status,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    code: self.public_code,
                    id: self.error_id.as_deref(),
                    message: &self.public_message,
                },
            }),
        )
            .into_response();

        if let Some(id) = self.error_id.as_deref()
            && let Ok(v) = HeaderValue::from_str(id)
        {
            response.headers_mut().insert("x-error-id", v);
        }

        response
    }
}
