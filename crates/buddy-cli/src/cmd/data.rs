use crate::cmd::Session;
use anyhow::Context;
use buddy_core::state::StateBundle;
use std::path::Path;

/// Replace the user's bundle with one read from a JSON export.
pub fn import(root: &Path, user: Option<&str>, file: &Path, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let bundle = StateBundle::from_json(&data)
        .with_context(|| format!("{} is not a valid state export", file.display()))?;
    session.save(&bundle)?;

    if json {
        crate::output::print_json(&serde_json::json!({
            "user": session.user,
            "events": bundle.logs.len(),
            "badges": bundle.badges.len(),
            "journal_count": bundle.journal_count,
        }))?;
    } else {
        println!(
            "Imported {} events, {} badges and {} journal entries for '{}'",
            bundle.logs.len(),
            bundle.badges.len(),
            bundle.journal_count,
            session.user
        );
    }
    Ok(())
}

/// Write the user's bundle as JSON to `output`, or stdout.
pub fn export(root: &Path, user: Option<&str>, output: Option<&Path>) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let bundle = session.load()?;
    let data = bundle.to_json()?;

    match output {
        Some(path) => {
            buddy_core::io::atomic_write(path, data.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported state for '{}' to {}", session.user, path.display());
        }
        None => println!("{data}"),
    }
    Ok(())
}
