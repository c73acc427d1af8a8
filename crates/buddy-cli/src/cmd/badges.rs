use crate::cmd::Session;
use crate::output::{print_json, print_table};
use buddy_core::badge::{Badge, BadgeRule, Metric};
use std::path::Path;

pub fn run(root: &Path, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let bundle = session.load()?;
    let owned = bundle.owned_keys();

    let locked: Vec<&BadgeRule> = session
        .config
        .badges
        .iter()
        .filter(|r| !owned.contains(&r.key))
        .collect();

    if json {
        print_json(&serde_json::json!({
            "earned": bundle.badges,
            "locked": locked,
        }))?;
        return Ok(());
    }

    if bundle.badges.is_empty() {
        println!("No badges earned yet.");
    } else {
        let tz = session.config.timezone;
        let rows = bundle
            .badges
            .iter()
            .map(|b: &Badge| vec![b.icon.clone(), b.label.clone(), tz.format_instant(b.earned_at)])
            .collect();
        print_table(&["", "BADGE", "EARNED"], rows);
    }

    if !locked.is_empty() {
        println!("\nStill to earn:");
        for rule in locked {
            println!("  {:<22} {}", rule.label, requirement(rule));
        }
    }
    Ok(())
}

fn requirement(rule: &BadgeRule) -> String {
    let n = rule.threshold;
    match rule.metric {
        Metric::CheckIns if n == 1 => "log your first meeting".to_string(),
        Metric::CheckIns => format!("log {n} meetings"),
        Metric::Journals if n == 1 => "write your first journal entry".to_string(),
        Metric::Journals => format!("write {n} journal entries"),
        Metric::Streak => format!("check in {n} days in a row"),
    }
}
