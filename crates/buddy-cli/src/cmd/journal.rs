use crate::cmd::Session;
use crate::output::{print_json, print_table};
use buddy_core::checkin;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum JournalSubcommand {
    /// Write a journal entry
    Add {
        /// Entry text
        text: String,
        /// How you are feeling (e.g. hopeful, anxious, grateful)
        #[arg(long, default_value = "")]
        mood: String,
    },
    /// List journal entries, newest first
    List {
        /// Show at most this many entries
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

pub fn run(
    root: &Path,
    user: Option<&str>,
    subcmd: JournalSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        JournalSubcommand::Add { text, mood } => add(root, user, &mood, &text, json),
        JournalSubcommand::List { limit } => list(root, user, limit, json),
    }
}

fn add(root: &Path, user: Option<&str>, mood: &str, text: &str, json: bool) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("journal entry text must not be empty");
    }
    let session = Session::open(root, user)?;
    let clock = session.clock();
    let mut bundle = session.load()?;

    let outcome =
        checkin::add_journal_entry(&mut bundle, mood, text, &clock, &session.config.badges);
    session.save(&bundle)?;

    if json {
        print_json(&outcome)?;
        return Ok(());
    }

    println!("Journal entry saved ({} total)", outcome.journal_count);
    for badge in &outcome.new_badges {
        println!("You earned a badge: {} {}", badge.icon, badge.label);
    }
    Ok(())
}

fn list(root: &Path, user: Option<&str>, limit: usize, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let bundle = session.load()?;
    let entries: Vec<_> = bundle.journals.iter().rev().take(limit).collect();

    if json {
        print_json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        println!("No journal entries yet.");
        return Ok(());
    }

    let tz = session.config.timezone;
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                tz.format_instant(e.created_at),
                e.mood.clone(),
                preview(&e.text, 60),
            ]
        })
        .collect();
    print_table(&["DATE", "MOOD", "ENTRY"], rows);
    Ok(())
}

fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("first line\nsecond", 20), "first line");
        assert_eq!(preview("ééééééééé", 6), "ééé...");
    }
}
