use axum::extract::State;
use axum::Json;
use buddy_core::config::Config;

use crate::state::AppState;

/// GET /api/config: the effective configuration, including the badge rules.
pub async fn get_config(State(app): State<AppState>) -> Json<Config> {
    Json(app.config.as_ref().clone())
}
