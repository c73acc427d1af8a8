use axum::extract::{Path, State};
use axum::Json;
use buddy_core::badge::{Badge, BadgeRule};
use serde::Serialize;

use crate::error::AppError;
use crate::routes::load;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BadgeBoard {
    pub earned: Vec<Badge>,
    pub locked: Vec<BadgeRule>,
}

/// GET /api/users/{user}/badges: earned badges and the rules still open.
pub async fn list_badges(
    State(app): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<BadgeBoard>, AppError> {
    let bundle = load(&app, user).await?;
    let owned = bundle.owned_keys();
    let locked = app
        .config
        .badges
        .iter()
        .filter(|r| !owned.contains(&r.key))
        .cloned()
        .collect();
    Ok(Json(BadgeBoard {
        earned: bundle.badges,
        locked,
    }))
}
