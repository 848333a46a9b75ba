use anyhow::Result;

use crate::app::{ensure_applied, App};
use crate::OutputFormat;

pub fn run(app: &mut App, id: i64, format: &OutputFormat) -> Result<()> {
    let snapshot = app.session.remove(id);
    ensure_applied(&snapshot)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "removed": id })),
        OutputFormat::Plain => println!("Deleted card #{} ({} cards left)", id, snapshot.cards.len()),
    }

    Ok(())
}
