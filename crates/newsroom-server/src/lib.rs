pub mod actor;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router for an initialized newsroom at `root`.
pub fn build_router(root: PathBuf) -> newsroom_core::Result<Router> {
    Ok(router(state::AppState::new(root)?))
}

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Articles
        .route("/api/articles", get(routes::articles::list_articles))
        .route("/api/articles", post(routes::articles::create_article))
        .route(
            "/api/articles/bulk-action",
            post(routes::bulk::bulk_action),
        )
        .route("/api/articles/{id}", get(routes::articles::get_article))
        .route(
            "/api/articles/{id}/actions",
            get(routes::articles::get_actions),
        )
        .route(
            "/api/articles/{id}/review-action",
            post(routes::review::review_action),
        )
        // Review queues
        .route(
            "/api/review-queue/{queue}",
            get(routes::queue::review_queue),
        )
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server on `port`.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener).await
}

/// Start the API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root)?;

    tracing::info!("newsroom API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
