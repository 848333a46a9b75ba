use anyhow::{bail, Context, Result};

use cardstack_lib::flashcards::{Card, CardId, Outcome, StudySnapshot};
use cardstack_lib::storage::{JsonFileBackend, MemoryBackend, StoreBackend};
use cardstack_lib::{AppConfig, StudySession};

/// Shared application state for CLI commands
pub struct App {
    pub session: StudySession,
}

impl App {
    /// Load the card store described by `config`
    pub async fn open(config: AppConfig, ephemeral: bool) -> Result<Self> {
        let backend: Box<dyn StoreBackend> = if ephemeral {
            Box::new(MemoryBackend::new())
        } else {
            let data_dir = config
                .resolve_data_dir()
                .context("Failed to get data directory")?;
            log::debug!("Using card store in {:?}", data_dir);
            Box::new(JsonFileBackend::new(data_dir))
        };

        let session = StudySession::open(&config, backend.as_ref()).await;
        if !ephemeral && !session.sync_status().persistent {
            eprintln!("warning: card store unavailable, changes will not be saved");
        }

        Ok(Self { session })
    }

    /// Flush pending writes and stop the synchronizer
    pub async fn close(self) {
        let status = self.session.close().await;
        if status.writes_failed > 0 {
            eprintln!(
                "warning: {} write(s) to the card store failed",
                status.writes_failed
            );
        }
    }

    /// Find a card by id
    pub fn find_card(&self, id: CardId) -> Result<Card> {
        self.session
            .cards()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .context(format!("No card with id {}", id))
    }

    /// Find a stack by name (case-insensitive prefix match)
    pub fn find_stack(&self, name: &str) -> Result<String> {
        let stacks = self.session.stacks();
        let name_lower = name.to_lowercase();

        // Exact match first
        if let Some(stack) = stacks.iter().find(|s| s.to_lowercase() == name_lower) {
            return Ok(stack.clone());
        }

        // Prefix match
        let matches: Vec<&String> = stacks
            .iter()
            .filter(|s| s.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.len() {
            0 => bail!(
                "No stack matching '{}'. Available stacks:\n{}",
                name,
                stacks.iter().map(|s| format!("  - {}", s)).collect::<Vec<_>>().join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous stack name '{}'. Matches:\n{}",
                name,
                matches.iter().map(|s| format!("  - {}", s)).collect::<Vec<_>>().join("\n")
            ),
        }
    }
}

/// Turn a rejected action into an error for the command line
pub fn ensure_applied(snapshot: &StudySnapshot) -> Result<()> {
    match &snapshot.outcome {
        Outcome::Rejected(rejection) => bail!("{}", rejection),
        Outcome::Applied | Outcome::Unchanged => Ok(()),
    }
}
