use axum::extract::{Path, State};
use axum::Json;
use buddy_core::checkin::{self, JournalOutcome};
use buddy_core::journal::JournalEntry;
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::{load, mutate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JournalBody {
    #[serde(default)]
    pub mood: String,
    pub text: String,
}

/// POST /api/users/{user}/journal: add an entry and return any badges it earned.
pub async fn add_entry(
    State(app): State<AppState>,
    Path(user): Path<String>,
    Json(body): Json<JournalBody>,
) -> Result<Json<JournalOutcome>, AppError> {
    if body.text.trim().is_empty() {
        return Err(AppError::bad_request("journal entry text must not be empty"));
    }
    let outcome = mutate(&app, user, move |bundle, clock, rules| {
        checkin::add_journal_entry(bundle, &body.mood, &body.text, clock, rules)
    })
    .await?;
    Ok(Json(outcome))
}

/// GET /api/users/{user}/journal: entries, newest first.
pub async fn list_entries(
    State(app): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<JournalEntry>>, AppError> {
    let bundle = load(&app, user).await?;
    Ok(Json(bundle.journals.into_iter().rev().collect()))
}
