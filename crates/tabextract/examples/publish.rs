//! Example: Publish a data file into a JSON extract.
//!
//! Usage:
//!   cargo run --example publish -- <file_path> [spatial_column]
//!
//! Example:
//!   cargo run --example publish -- sites.csv location

use std::env;
use std::path::Path;

use tabextract::{CsvParser, ExtractConfig, ExtractTable, NoProgress, Publisher};

fn main() -> tabextract::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example publish -- <file_path> [spatial_column]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example publish -- sites.csv location");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let (frame, source) = CsvParser::new().parse_file(path)?;
    let name = source.stem();
    let mut table = ExtractTable::new(name.clone(), frame).with_source(source);

    if let Some(column) = args.get(2) {
        table.set_spatial(column.as_str(), true)?;
    }

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Columns of {}", path.display());
    println!("{}", separator);
    for profile in table.profile() {
        println!(
            "  {:24} {:20} -> {}",
            profile.name,
            profile.category.name(),
            profile.target.name()
        );
    }
    println!();

    let config = ExtractConfig::default().with_index(true);
    let publisher = Publisher::with_config(name, config).with_table(table);
    let report = publisher.publish_to_file(&mut NoProgress)?;

    for table in &report.tables {
        println!(
            "{}: {} rows, {} cells written as null",
            table.name, table.rows_written, table.degraded_cells
        );
    }
    println!("Saved to {}", publisher.output_path().display());

    Ok(())
}
