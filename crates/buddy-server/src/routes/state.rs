use axum::extract::{Path, State};
use axum::Json;
use buddy_core::clock::Clock;
use buddy_core::dates;
use buddy_core::state::{StateBundle, Summary};
use serde::Serialize;

use crate::error::AppError;
use crate::routes::{load, mutate};
use crate::state::AppState;

/// GET /api/users/{user}/state: the whole bundle in its export shape.
pub async fn get_state(
    State(app): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<StateBundle>, AppError> {
    Ok(Json(load(&app, user).await?))
}

/// PUT /api/users/{user}/state: replace the bundle. Malformed fields fall
/// back to their defaults, as on load.
pub async fn put_state(
    State(app): State<AppState>,
    Path(user): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<Json<StateBundle>, AppError> {
    if !value.is_object() {
        return Err(AppError::bad_request("state must be a JSON object"));
    }
    let incoming: StateBundle = serde_json::from_value(value)
        .map_err(|e| AppError::bad_request(format!("invalid state: {e}")))?;
    let incoming = incoming.sanitize();

    let saved = mutate(&app, user, move |bundle, _, _| {
        *bundle = incoming;
        bundle.clone()
    })
    .await?;
    Ok(Json(saved))
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub user: String,
    #[serde(flatten)]
    pub summary: Summary,
}

/// GET /api/users/{user}/status: streak, counts and days sober as of today.
pub async fn get_status(
    State(app): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<StatusView>, AppError> {
    let today = app.clock.today();
    let bundle = load(&app, user.clone()).await?;
    tracing::debug!(user = %user, today = %dates::format_date(today), "status");
    Ok(Json(StatusView {
        summary: bundle.summary(today),
        user,
    }))
}
