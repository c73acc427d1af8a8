use anyhow::Context;
use buddy_core::{
    clock::Clock,
    config::Config,
    store::{FileStore, StateStore},
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
    pub locks: UserLocks,
}

impl AppState {
    /// File-backed state rooted at an initialized `.buddy/` directory, using
    /// the wall clock in the configured zone.
    pub fn new(root: PathBuf) -> anyhow::Result<Self> {
        let config = Config::load(&root).context("failed to load config")?;
        config.ensure_valid()?;
        for w in config.validate() {
            tracing::warn!("config: {}", w.message);
        }
        let store = FileStore::open(&root)?;
        let clock = config.clock();
        Ok(Self::with_parts(Arc::new(store), Arc::new(clock), config))
    }

    pub fn with_parts(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>, config: Config) -> Self {
        Self {
            store,
            clock,
            config: Arc::new(config),
            locks: UserLocks::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// UserLocks
// ---------------------------------------------------------------------------

/// One async mutex per user. A handler holds its user's lock across
/// load, mutate and save so concurrent requests for the same user apply in
/// sequence; different users never contend.
///
/// Entries nobody holds or waits on are pruned whenever a lock is taken.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl UserLocks {
    pub async fn lock(&self, user: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // The map's own Arc is the only reference to an idle entry.
            map.retain(|_, m| Arc::strong_count(m) > 1);
            map.entry(user.to_string()).or_default().clone()
        };
        mutex.lock_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
