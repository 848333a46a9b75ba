use anyhow::Result;

use crate::app::{ensure_applied, App};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    front: &str,
    back: &str,
    stack: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let snapshot = app.session.add(front, back, stack.unwrap_or(""));
    ensure_applied(&snapshot)?;

    let Some(card) = snapshot.cards.last() else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(card)?),
        OutputFormat::Plain => println!("Added card #{} to '{}'", card.id, card.stack),
    }

    Ok(())
}
