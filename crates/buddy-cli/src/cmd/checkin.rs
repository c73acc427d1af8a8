use crate::cmd::Session;
use crate::output::{days, print_json};
use buddy_core::checkin;
use std::path::Path;

pub fn check_in(
    root: &Path,
    user: Option<&str>,
    location: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let clock = session.clock();
    let mut bundle = session.load()?;

    let outcome = checkin::check_in(&mut bundle, location, &clock, &session.config.badges);
    session.save(&bundle)?;

    if json {
        print_json(&outcome)?;
        return Ok(());
    }

    let tz = session.config.timezone;
    let at = tz.format_instant(outcome.event.timestamp);
    match &outcome.event.location {
        Some(loc) => println!("Checked in at {at} ({loc})"),
        None => println!("Checked in at {at}"),
    }
    if outcome.streak_changed() {
        println!(
            "Streak: {} (longest {})",
            days(outcome.streak.current),
            days(outcome.streak.longest)
        );
    } else {
        println!(
            "Already checked in today. Streak: {}",
            days(outcome.streak.current)
        );
    }
    for badge in &outcome.new_badges {
        println!("You earned a badge: {} {}", badge.icon, badge.label);
    }
    Ok(())
}

pub fn check_out(root: &Path, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let clock = session.clock();
    let mut bundle = session.load()?;

    let event = checkin::check_out(&mut bundle, &clock);
    session.save(&bundle)?;

    if json {
        print_json(&event)?;
    } else {
        println!(
            "Checked out at {}",
            session.config.timezone.format_instant(event.timestamp)
        );
    }
    Ok(())
}
