pub mod badges;
pub mod checkin;
pub mod config;
pub mod data;
pub mod init;
pub mod journal;
pub mod log;
pub mod serve;
pub mod sobriety;
pub mod status;
pub mod users;

use anyhow::Context;
use buddy_core::{
    clock::SystemClock,
    config::Config,
    paths,
    state::StateBundle,
    store::{FileStore, StateStore},
};
use std::path::Path;

/// Everything a per-user command needs: the loaded config, the store and the
/// resolved user.
pub struct Session {
    pub config: Config,
    pub store: FileStore,
    pub user: String,
}

impl Session {
    /// User priority: `--user` / `BUDDY_USER`, then `default_user` from the
    /// config, then `guest`.
    pub fn open(root: &Path, user: Option<&str>) -> anyhow::Result<Self> {
        let config = Config::load(root).context("failed to load config")?;
        config.ensure_valid()?;
        let store = FileStore::open(root)?;
        let user = user.unwrap_or_else(|| config.user()).to_string();
        paths::validate_user(&user)?;
        Ok(Self {
            config,
            store,
            user,
        })
    }

    pub fn clock(&self) -> SystemClock {
        self.config.clock()
    }

    pub fn load(&self) -> anyhow::Result<StateBundle> {
        self.store
            .load(&self.user)
            .with_context(|| format!("failed to load state for '{}'", self.user))
    }

    pub fn save(&self, bundle: &StateBundle) -> anyhow::Result<()> {
        self.store
            .save(&self.user, bundle)
            .with_context(|| format!("failed to save state for '{}'", self.user))
    }
}
