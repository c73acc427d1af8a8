use crate::output::{days, print_json, print_table};
use anyhow::Context;
use buddy_core::{
    clock::Clock,
    config::Config,
    dates,
    store::{FileStore, StateStore},
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct UserRow {
    user: String,
    check_ins: usize,
    streak: u32,
    longest_streak: u32,
    last_check_in: Option<String>,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let store = FileStore::open(root)?;
    let today = config.clock().today();

    let mut rows = Vec::new();
    for user in store.users()? {
        let summary = store
            .load(&user)
            .with_context(|| format!("failed to load state for '{user}'"))?
            .summary(today);
        rows.push(UserRow {
            user,
            check_ins: summary.check_ins,
            streak: summary.streak,
            longest_streak: summary.longest_streak,
            last_check_in: summary.last_check_in.map(dates::format_date),
        });
    }

    if json {
        print_json(&rows)?;
        return Ok(());
    }

    if rows.is_empty() {
        println!("No users yet.");
        return Ok(());
    }

    let table = rows
        .into_iter()
        .map(|r| {
            vec![
                r.user,
                r.check_ins.to_string(),
                days(r.streak),
                days(r.longest_streak),
                r.last_check_in.unwrap_or_else(|| "never".to_string()),
            ]
        })
        .collect();
    print_table(&["USER", "MEETINGS", "STREAK", "LONGEST", "LAST CHECK-IN"], table);
    Ok(())
}
