use std::fs::File;
use std::io::{self, Write};

use anyhow::{Context, Result};

use cardstack_lib::flashcards::ExportRow;

use crate::app::App;

/// Write rows as header-less CSV: front, back, stack
pub fn write_csv<W: Write>(rows: &[ExportRow], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    for row in rows {
        writer.write_record([&row.front, &row.back, &row.stack])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run(app: &App, output: &str) -> Result<()> {
    let rows = app.session.export();

    if output == "-" {
        write_csv(&rows, io::stdout().lock())?;
    } else {
        let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
        write_csv(&rows, file).with_context(|| format!("Failed to write {}", output))?;
        eprintln!("Exported {} cards to {}", rows.len(), output);
    }

    Ok(())
}
