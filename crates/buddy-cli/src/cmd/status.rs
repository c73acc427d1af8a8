use crate::cmd::Session;
use crate::output::{days, print_json};
use buddy_core::{clock::Clock, dates, state::Summary};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct StatusView<'a> {
    user: &'a str,
    #[serde(flatten)]
    summary: Summary,
}

pub fn run(root: &Path, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let today = session.clock().today();
    let bundle = session.load()?;
    let summary = bundle.summary(today);

    if json {
        print_json(&StatusView {
            user: &session.user,
            summary,
        })?;
        return Ok(());
    }

    println!("User:            {}", session.user);
    if let Some(n) = summary.days_sober {
        println!("Days sober:      {n}");
    }
    println!(
        "Current streak:  {}{}",
        days(summary.streak),
        if summary.lapsed {
            " (lapsed, check in to start again)"
        } else {
            ""
        }
    );
    println!("Longest streak:  {}", days(summary.longest_streak));
    println!(
        "Last check-in:   {}",
        summary
            .last_check_in
            .map(dates::format_date)
            .unwrap_or_else(|| "never".to_string())
    );
    println!("Meetings logged: {}", summary.check_ins);
    println!("Journal entries: {}", summary.journal_count);
    println!("Badges earned:   {}", summary.badges);
    Ok(())
}
