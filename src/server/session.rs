//! Per-browser transient state.
//!
//! A browser gets a random session id in a cookie once it has an accepted
//! result to remember. The store keeps at most one [`PredictionResult`] per
//! session so the result panel can be redrawn on later page loads without
//! running the model again. Sessions idle-expire.

use crate::core::constants::SESSION_COOKIE_NAME;
use crate::domain::PredictionResult;
use axum::http::{HeaderMap, HeaderValue, header};
use std::time::Duration;
use uuid::Uuid;

/// What a session remembers between requests.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The last accepted prediction, cleared by a rejection.
    pub last_result: Option<PredictionResult>,
}

/// A session resolved for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: Uuid,
    /// True when the request carried no known session. Nothing is stored for
    /// the id until a result is, and only then does the response set the cookie.
    pub is_new: bool,
}

/// Cookie-keyed session store with idle expiry.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: moka::sync::Cache<Uuid, SessionState>,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: moka::sync::Cache::builder()
                .max_capacity(100_000)
                .time_to_idle(idle_ttl)
                .build(),
        }
    }

    /// Finds the session named by the request cookie, or picks a fresh id
    /// without storing anything for it.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        if let Some(id) = session_id_from_headers(headers)
            && self.sessions.contains_key(&id)
        {
            return SessionHandle { id, is_new: false };
        }

        SessionHandle {
            id: Uuid::new_v4(),
            is_new: true,
        }
    }

    /// Returns the stored result of a session, refreshing its idle timer.
    pub fn last_result(&self, id: &Uuid) -> Option<PredictionResult> {
        self.sessions.get(id).and_then(|state| state.last_result)
    }

    /// Remembers an accepted result, creating the session if needed.
    pub fn store_result(&self, id: Uuid, result: PredictionResult) {
        self.sessions.insert(
            id,
            SessionState {
                last_result: Some(result),
            },
        );
    }

    /// Forgets the stored result. A session holding nothing is dropped.
    pub fn clear_result(&self, id: Uuid) {
        self.sessions.invalidate(&id);
    }
}

/// Extracts the session id from the `Cookie` headers, if present and well formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Builds the `Set-Cookie` value for a session id.
pub fn session_cookie(id: Uuid) -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={id}; HttpOnly; SameSite=Lax; Path=/"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("banaclass_session=; Path=/"))
}
