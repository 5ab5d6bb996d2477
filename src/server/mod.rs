//! The web front end.
//!
//! Routes:
//!
//! * `GET /`, `POST /classify` - upload form and result panel
//! * `GET /varieties`, `GET /about` - static content pages
//! * `POST /api/v1/classify`, `GET /api/v1/labels`, `GET /api/v1/varieties` - JSON API
//! * `GET /health` - liveness and pipeline counters
//! * `/static/*` - files from the asset directory

pub mod error;
pub mod render;
mod routes;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use routes::UPLOAD_FIELD;
pub use state::{AppState, State};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

pub fn construct_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .merge(routes::pages::routes())
        .nest("/api/v1", routes::api::routes())
        .nest("/health", routes::health::routes())
        .with_state(state)
        .nest_service("/static", assets)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(state.config.bind.as_str()).await?;
    info!(
        addr = %listener.local_addr()?,
        model = state.pipeline.classifier().model_name(),
        "BanaClass listening"
    );

    axum::serve(listener, construct_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!(error = %e, "Could not listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
