use crate::cmd::Session;
use crate::output::{days, print_json};
use buddy_core::{
    clock::Clock,
    dates::{self, days_sober},
};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum SobrietySubcommand {
    /// Show the sobriety date and days sober
    Show,
    /// Set the sobriety date (YYYY-MM-DD)
    Set { date: String },
    /// Remove the sobriety date
    Clear,
}

pub fn run(
    root: &Path,
    user: Option<&str>,
    subcmd: SobrietySubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let today = session.clock().today();
    let mut bundle = session.load()?;

    match subcmd {
        SobrietySubcommand::Show => {}
        SobrietySubcommand::Set { date } => {
            let date = dates::parse_date(&date)?;
            if date > today {
                anyhow::bail!(
                    "sobriety date {} is in the future",
                    dates::format_date(date)
                );
            }
            bundle.sobriety_date = Some(date);
            session.save(&bundle)?;
            tracing::info!(date = %date, "sobriety date set");
        }
        SobrietySubcommand::Clear => {
            bundle.sobriety_date = None;
            session.save(&bundle)?;
        }
    }

    let count = days_sober(bundle.sobriety_date, today);
    if json {
        print_json(&serde_json::json!({
            "sobriety_date": bundle.sobriety_date.map(dates::format_date),
            "days_sober": count,
        }))?;
        return Ok(());
    }

    match (bundle.sobriety_date, count) {
        (Some(date), Some(n)) => {
            println!("Sober since {} ({})", dates::format_date(date), days(n))
        }
        _ => println!("No sobriety date set."),
    }
    Ok(())
}
