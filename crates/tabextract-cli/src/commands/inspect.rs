//! Inspect command - show inferred column types of a data file.

use std::path::PathBuf;

use colored::{ColoredString, Colorize};
use tabextract::{ColumnProfile, CsvParser, ExtractTable};

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (frame, source) = CsvParser::new().parse_file(&file)?;
    let table = ExtractTable::from_frame(frame).with_source(source.clone());
    let profiles = table.profile();

    if json_output {
        let report = serde_json::json!({
            "source": source,
            "columns": profiles,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows, {} columns, {})",
        "Columns of".cyan().bold(),
        source.file.white(),
        source.row_count,
        source.column_count,
        source.format
    );
    println!();
    println!(
        "  {:24} {:20} {:16} {:>8}  {}",
        "Column".bold(),
        "Category".bold(),
        "Type".bold(),
        "Nulls".bold(),
        "Samples".bold()
    );

    for profile in &profiles {
        println!(
            "  {:24} {:20} {:16} {:>7.1}%  {}",
            profile.name,
            category_label(profile),
            profile.target.name(),
            profile.null_percentage(),
            profile.sample_values.join(", ").dimmed()
        );
    }

    Ok(())
}

fn category_label(profile: &ColumnProfile) -> ColoredString {
    let name = profile.category.name();
    if profile.category.is_numeric() {
        name.blue()
    } else if profile.category.is_temporal() {
        name.magenta()
    } else {
        name.normal()
    }
}
