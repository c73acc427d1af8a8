pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the router over the file store at `root`.
pub fn build_router(root: PathBuf) -> anyhow::Result<Router> {
    Ok(router(AppState::new(root)?))
}

/// Build the router with all API routes and middleware over an existing state.
/// Used by `build_router()` and by tests that inject a store or clock.
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/config", get(routes::config::get_config))
        // Per-user state
        .route(
            "/api/users/{user}/state",
            get(routes::state::get_state).put(routes::state::put_state),
        )
        .route("/api/users/{user}/status", get(routes::state::get_status))
        // Check-ins
        .route(
            "/api/users/{user}/check-in",
            post(routes::checkins::check_in),
        )
        .route(
            "/api/users/{user}/check-out",
            post(routes::checkins::check_out),
        )
        .route("/api/users/{user}/logs", get(routes::checkins::list_logs))
        // Journal
        .route(
            "/api/users/{user}/journal",
            get(routes::journal::list_entries).post(routes::journal::add_entry),
        )
        // Badges
        .route("/api/users/{user}/badges", get(routes::badges::list_badges))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server on a pre-bound listener, so the caller can read the
/// actual port first when `port = 0`.
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root)?;

    tracing::info!("Recovery Buddy API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
