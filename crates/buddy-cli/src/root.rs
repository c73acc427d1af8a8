use buddy_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the Recovery Buddy root directory.
///
/// Priority:
/// 1. `--root` flag / `BUDDY_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.buddy/`
/// 3. Fall back to the home directory
pub fn resolve_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(found) = find_upward(&cwd) {
        return Ok(found);
    }

    Ok(paths::home_root()?)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(paths::BUDDY_DIR).is_dir() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}
