//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tabextract::TargetType;

/// tabextract: convert delimited files into typed columnar extracts
#[derive(Parser)]
#[command(name = "tabextract")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one or more data files into a single extract
    Convert {
        /// Paths to the data files (CSV/TSV)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Extract name (default: stem of the first file)
        #[arg(short, long)]
        name: Option<String>,

        /// Directory for the extract file (default: from config, else temp dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Table name for each file, in order (default: file stem)
        #[arg(short, long = "table", value_name = "NAME")]
        tables: Vec<String>,

        /// Prepend a row counter column to new tables
        #[arg(long)]
        add_index: bool,

        /// Mark a column as spatial (repeatable)
        #[arg(long, value_name = "COLUMN")]
        spatial: Vec<String>,

        /// Set a column type manually, e.g. `zip=unicode_string` (repeatable)
        #[arg(long = "type", value_name = "COLUMN=TYPE", value_parser = parse_type_override)]
        types: Vec<TypeOverride>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Don't show a progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show the inferred type of every column of a data file
    Inspect {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the tables of an existing extract
    Tables {
        /// Path to the extract file
        #[arg(value_name = "EXTRACT")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// A `COLUMN=TYPE` pair given on the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeOverride {
    pub column: String,
    pub target: TargetType,
}

fn parse_type_override(s: &str) -> Result<TypeOverride, String> {
    let (column, target) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected COLUMN=TYPE, got '{}'", s))?;
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", s));
    }
    let target = target.parse::<TargetType>().map_err(|e| e.to_string())?;
    Ok(TypeOverride {
        column: column.to_string(),
        target,
    })
}
