use crate::error::{BuddyError, Result};
use crate::paths;
use crate::state::StateBundle;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Load/save boundary for per-user state bundles. Bundles are always read and
/// written whole.
pub trait StateStore: Send + Sync {
    /// A user with no stored bundle gets the default bundle.
    fn load(&self, user: &str) -> Result<StateBundle>;

    fn save(&self, user: &str, bundle: &StateBundle) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// YAML bundles under `<root>/.buddy/users/<user>/state.yaml`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open the store at `root`, which must have been initialized.
    pub fn open(root: &Path) -> Result<Self> {
        if !paths::is_initialized(root) {
            return Err(BuddyError::NotInitialized);
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Users that have a stored bundle, sorted.
    pub fn users(&self) -> Result<Vec<String>> {
        let dir = paths::users_dir(&self.root);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut users = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if paths::validate_user(&name).is_ok() && entry.path().join(paths::STATE_FILE).exists() {
                users.push(name);
            }
        }
        users.sort();
        Ok(users)
    }
}

impl StateStore for FileStore {
    fn load(&self, user: &str) -> Result<StateBundle> {
        paths::validate_user(user)?;
        let path = paths::state_path(&self.root, user);
        if !path.exists() {
            debug!(user, "no stored bundle, starting fresh");
            return Ok(StateBundle::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(StateBundle::default());
        }
        let bundle: StateBundle = serde_yaml::from_str(&data)?;
        Ok(bundle.sanitize())
    }

    fn save(&self, user: &str, bundle: &StateBundle) -> Result<()> {
        paths::validate_user(user)?;
        let path = paths::state_path(&self.root, user);
        let data = serde_yaml::to_string(bundle)?;
        crate::io::atomic_write(&path, data.as_bytes())?;
        debug!(user, path = %path.display(), "saved bundle");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bundles: Mutex<HashMap<String, StateBundle>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, user: &str) -> Result<StateBundle> {
        paths::validate_user(user)?;
        let bundles = self.bundles.lock().unwrap_or_else(|e| e.into_inner());
        Ok(bundles.get(user).cloned().unwrap_or_default())
    }

    fn save(&self, user: &str, bundle: &StateBundle) -> Result<()> {
        paths::validate_user(user)?;
        let mut bundles = self.bundles.lock().unwrap_or_else(|e| e.into_inner());
        bundles.insert(user.to_string(), bundle.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
