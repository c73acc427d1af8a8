use crate::cmd::Session;
use crate::output::{print_json, print_table};
use std::path::Path;

pub fn run(root: &Path, user: Option<&str>, limit: usize, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root, user)?;
    let bundle = session.load()?;
    let events: Vec<_> = bundle.logs.iter_newest_first().take(limit).collect();

    if json {
        print_json(&events)?;
        return Ok(());
    }

    if events.is_empty() {
        println!("No meetings logged yet.");
        return Ok(());
    }

    let tz = session.config.timezone;
    let rows = events
        .iter()
        .map(|e| {
            vec![
                tz.format_instant(e.timestamp),
                e.kind.to_string(),
                e.location.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["WHEN", "TYPE", "LOCATION"], rows);

    if bundle.logs.len() > events.len() {
        println!("\n({} of {} events shown)", events.len(), bundle.logs.len());
    }
    Ok(())
}
