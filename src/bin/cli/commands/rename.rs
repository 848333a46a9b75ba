use anyhow::Result;

use crate::app::{ensure_applied, App};
use crate::OutputFormat;

/// Rename `old` exactly as given; a name no card owns is rejected
pub fn run(app: &mut App, old: &str, new: &str, format: &OutputFormat) -> Result<()> {
    let moved = app.session.cards().iter().filter(|c| c.stack == old).count();

    let snapshot = app.session.rename_stack(old, new);
    ensure_applied(&snapshot)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "old": old, "new": new, "cards": moved })
        ),
        OutputFormat::Plain => println!("Renamed '{}' to '{}' ({} cards)", old, new, moved),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardstack_lib::sync::Synchronizer;
    use cardstack_lib::{AppConfig, StudySession};

    fn app_with(stack: &str) -> App {
        let config = AppConfig::default();
        let mut session = StudySession::new(&config, Synchronizer::detached(), Vec::new());
        session.add("f", "b", stack);
        App { session }
    }

    #[test]
    fn test_rename_needs_exact_stack_name() {
        let mut app = app_with("New Stack Verbs");

        let err = run(&mut app, "new", "Nouns", &OutputFormat::Plain).unwrap_err();
        assert!(err.to_string().contains("new"));
        assert_eq!(app.session.stacks(), ["New Stack Verbs".to_string()]);
    }

    #[test]
    fn test_rename_moves_every_card() {
        let mut app = app_with("Verbs");
        app.session.add("g", "c", "Verbs");

        run(&mut app, "Verbs", "Nouns", &OutputFormat::Json).unwrap();
        assert_eq!(app.session.stacks(), ["Nouns".to_string()]);
        assert_eq!(app.session.cards().len(), 2);
    }
}
