use anyhow::Result;

use crate::app::App;
use crate::render::terminal as renderer;
use crate::OutputFormat;

pub fn run(app: &App, stack: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stacks = match stack {
        Some(name) => vec![app.find_stack(name)?],
        None => app.session.stacks().to_vec(),
    };

    let cards: Vec<_> = app
        .session
        .cards()
        .iter()
        .filter(|c| stacks.contains(&c.stack))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards yet. Add one with: cardstack-cli add <front> <back>");
                return Ok(());
            }

            let id_width = cards.iter().map(|c| c.id.to_string().len()).max().unwrap_or(1);

            for stack in &stacks {
                let in_stack: Vec<_> = cards.iter().filter(|c| c.stack == *stack).collect();
                println!("{}", renderer::stack_header(stack, in_stack.len(), use_color));
                for card in in_stack {
                    println!("{}", renderer::card_line(card, id_width, use_color));
                }
                println!();
            }

            println!("{} cards total", cards.len());
        }
    }

    Ok(())
}
