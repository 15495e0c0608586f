//! Tables command - list the tables of an extract.

use std::path::PathBuf;

use colored::Colorize;
use tabextract::sink::ExtractDocument;

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Extract not found: {}", file.display()).into());
    }

    let document = ExtractDocument::load(&file)?;

    if json_output {
        let tables: Vec<_> = document
            .tables
            .iter()
            .map(|(name, table)| {
                serde_json::json!({
                    "name": name,
                    "rows": table.row_count(),
                    "schema": table.schema,
                })
            })
            .collect();
        let status = serde_json::json!({
            "format_version": document.format_version,
            "created_at": document.created_at,
            "updated_at": document.updated_at,
            "tables": tables,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {} (format {}, updated {})",
        "Extract".cyan().bold(),
        file.display().to_string().white(),
        document.format_version,
        document.updated_at.format("%Y-%m-%d %H:%M:%S")
    );

    if document.tables.is_empty() {
        println!("{}", "No tables".yellow());
        return Ok(());
    }

    for (name, table) in &document.tables {
        println!();
        println!(
            "{} {} rows",
            name.white().bold(),
            table.row_count().to_string().green()
        );
        for (column, target) in table.schema.iter() {
            let marker = if table.schema.index_column() == Some(column) {
                " (index)".dimmed().to_string()
            } else {
                String::new()
            };
            println!("  {:24} {}{}", column, target.name().yellow(), marker);
        }
    }

    Ok(())
}
