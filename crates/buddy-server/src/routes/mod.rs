pub mod badges;
pub mod checkins;
pub mod config;
pub mod health;
pub mod journal;
pub mod state;

use crate::error::AppError;
use crate::state::AppState;
use axum::body::Bytes;
use buddy_core::{badge::BadgeRule, clock::Clock, paths, state::StateBundle};
use serde::de::DeserializeOwned;

/// Run `f` against `user`'s bundle as one load, mutate and save step, holding
/// the user's lock throughout.
pub(crate) async fn mutate<T, F>(app: &AppState, user: String, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut StateBundle, &dyn Clock, &[BadgeRule]) -> T + Send + 'static,
{
    paths::validate_user(&user)?;
    let _guard = app.locks.lock(&user).await;

    let store = app.store.clone();
    let clock = app.clock.clone();
    let config = app.config.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut bundle = store.load(&user)?;
        let out = f(&mut bundle, clock.as_ref(), &config.badges);
        store.save(&user, &bundle)?;
        Ok::<_, buddy_core::BuddyError>(out)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(result)
}

/// Load `user`'s bundle without taking the lock; writes are atomic so a
/// reader always sees a whole bundle.
pub(crate) async fn load(app: &AppState, user: String) -> Result<StateBundle, AppError> {
    paths::validate_user(&user)?;
    let store = app.store.clone();
    let bundle = tokio::task::spawn_blocking(move || store.load(&user))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(bundle)
}

/// Decode an optional JSON body; an empty body decodes to the default.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::bad_request(format!("invalid JSON body: {e}")))
}
