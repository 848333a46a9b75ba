use anyhow::Result;

use crate::app::{ensure_applied, App};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    id: i64,
    front: Option<&str>,
    back: Option<&str>,
    stack: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let existing = app.find_card(id)?;
    let front = front.unwrap_or(&existing.front);
    let back = back.unwrap_or(&existing.back);

    let snapshot = app.session.edit(id, front, back, stack);
    ensure_applied(&snapshot)?;
    let card = app.find_card(id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            if card == existing {
                println!("Card #{} unchanged", id);
            } else {
                println!("Updated card #{} in '{}'", id, card.stack);
            }
        }
    }

    Ok(())
}
