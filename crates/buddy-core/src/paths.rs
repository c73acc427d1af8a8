use crate::error::{BuddyError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const BUDDY_DIR: &str = ".buddy";
pub const USERS_DIR: &str = ".buddy/users";
pub const CONFIG_FILE: &str = ".buddy/config.yaml";
pub const STATE_FILE: &str = "state.yaml";

/// User the original app falls back to when nobody is signed in.
pub const GUEST_USER: &str = "guest";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn buddy_dir(root: &Path) -> PathBuf {
    root.join(BUDDY_DIR)
}

pub fn users_dir(root: &Path) -> PathBuf {
    root.join(USERS_DIR)
}

pub fn user_dir(root: &Path, user: &str) -> PathBuf {
    users_dir(root).join(user)
}

pub fn state_path(root: &Path, user: &str) -> PathBuf {
    user_dir(root, user).join(STATE_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn is_initialized(root: &Path) -> bool {
    buddy_dir(root).is_dir()
}

/// Root used when no `.buddy/` directory is found above the working directory.
pub fn home_root() -> Result<PathBuf> {
    home::home_dir().ok_or(BuddyError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// User validation
// ---------------------------------------------------------------------------

static USER_RE: OnceLock<Regex> = OnceLock::new();

fn user_re() -> &'static Regex {
    USER_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_\-]*$").unwrap())
}

/// User ids become directory names, so they are restricted to a safe charset.
pub fn validate_user(user: &str) -> Result<()> {
    if user.is_empty() || user.len() > 64 || !user_re().is_match(user) {
        return Err(BuddyError::InvalidUser(user.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
