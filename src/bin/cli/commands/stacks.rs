use anyhow::Result;

use crate::app::App;
use crate::render::terminal as renderer;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let counts: Vec<(String, usize)> = app
        .session
        .stacks()
        .iter()
        .map(|stack| {
            let count = app.session.cards().iter().filter(|c| c.stack == *stack).count();
            (stack.clone(), count)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = counts
                .iter()
                .map(|(stack, count)| {
                    serde_json::json!({
                        "stack": stack,
                        "count": count,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if counts.is_empty() {
                println!("No stacks found.");
                return Ok(());
            }

            for (stack, count) in &counts {
                println!("{}", renderer::stack_header(stack, *count, use_color));
            }
            println!("\n{} stacks total", counts.len());
        }
    }

    Ok(())
}
