//! tabextract CLI - convert delimited files into typed columnar extracts.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Convert {
            files,
            name,
            output_dir,
            tables,
            add_index,
            spatial,
            types,
            config,
            no_progress,
        } => commands::convert::run(commands::convert::ConvertArgs {
            files,
            name,
            output_dir,
            tables,
            add_index,
            spatial,
            types,
            config,
            show_progress: !no_progress && !cli.quiet,
        }),

        Commands::Inspect { file, json } => commands::inspect::run(file, json),

        Commands::Tables { file, json } => commands::tables::run(file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
