use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use buddy_core::checkin::{self, CheckInOutcome};
use buddy_core::event_log::CheckInEvent;
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::{load, mutate, optional_json};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CheckInBody {
    #[serde(default)]
    pub location: Option<String>,
}

/// POST /api/users/{user}/check-in: log a check-in, advance the streak and
/// return any badges it earned.
pub async fn check_in(
    State(app): State<AppState>,
    Path(user): Path<String>,
    body: Bytes,
) -> Result<Json<CheckInOutcome>, AppError> {
    let body: CheckInBody = optional_json(&body)?;
    let outcome = mutate(&app, user, move |bundle, clock, rules| {
        checkin::check_in(bundle, body.location, clock, rules)
    })
    .await?;
    Ok(Json(outcome))
}

/// POST /api/users/{user}/check-out
pub async fn check_out(
    State(app): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<CheckInEvent>, AppError> {
    let event = mutate(&app, user, |bundle, clock, _| checkin::check_out(bundle, clock)).await?;
    Ok(Json(event))
}

/// GET /api/users/{user}/logs: check-in log, newest first.
pub async fn list_logs(
    State(app): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<CheckInEvent>>, AppError> {
    let bundle = load(&app, user).await?;
    Ok(Json(bundle.logs.to_newest_first()))
}
