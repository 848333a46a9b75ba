mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use cardstack_lib::AppConfig;

#[derive(Parser)]
#[command(name = "cardstack-cli", about = "Flashcard stacks: edit, export and study", version)]
struct Cli {
    /// Config file (default: <config dir>/cardstack/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the card store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep cards in memory only; nothing is saved
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List cards, grouped by stack
    List {
        /// Only show this stack
        #[arg(long)]
        stack: Option<String>,
    },

    /// List stacks with their card counts
    Stacks,

    /// Add a card
    Add {
        front: String,
        back: String,
        /// Stack to add to (default: the configured default stack)
        #[arg(long)]
        stack: Option<String>,
    },

    /// Edit a card; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(long)]
        stack: Option<String>,
    },

    /// Delete a card
    Rm { id: i64 },

    /// Rename a stack, moving all of its cards
    RenameStack { old: String, new: String },

    /// Export every card as CSV (front, back, stack)
    Export {
        /// Output file, "-" for stdout
        #[arg(long, short, default_value = "cards.csv")]
        output: String,
    },

    /// Launch the interactive study screen
    #[cfg(feature = "tui")]
    Study,
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => AppConfig::load_default().context("Failed to read config")?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    Ok(config)
}

#[cfg(feature = "tui")]
fn run_default(app: &mut app::App) -> anyhow::Result<()> {
    tui::run(app)
}

#[cfg(not(feature = "tui"))]
fn run_default(_app: &mut app::App) -> anyhow::Result<()> {
    eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
    eprintln!("Run with --help for usage.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::open(config, cli.ephemeral).await?;

    let result = match cli.command {
        // No subcommand → launch TUI
        None => run_default(&mut app),
        Some(Command::List { stack }) => {
            commands::list::run(&app, stack.as_deref(), &cli.format, use_color)
        }
        Some(Command::Stacks) => commands::stacks::run(&app, &cli.format, use_color),
        Some(Command::Add { front, back, stack }) => {
            commands::add::run(&mut app, &front, &back, stack.as_deref(), &cli.format)
        }
        Some(Command::Edit { id, front, back, stack }) => commands::edit::run(
            &mut app,
            id,
            front.as_deref(),
            back.as_deref(),
            stack.as_deref(),
            &cli.format,
        ),
        Some(Command::Rm { id }) => commands::remove::run(&mut app, id, &cli.format),
        Some(Command::RenameStack { old, new }) => {
            commands::rename::run(&mut app, &old, &new, &cli.format)
        }
        Some(Command::Export { output }) => commands::export::run(&app, &output),
        #[cfg(feature = "tui")]
        Some(Command::Study) => tui::run(&mut app),
    };

    // Saves whatever the command changed, even when it failed part-way
    app.close().await;
    result
}
