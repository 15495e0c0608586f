//! Convert command - publish data files into one extract.

use std::path::PathBuf;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabextract::{
    CsvParser, ExtractConfig, ExtractError, ExtractTable, NoProgress, Progress, Publisher,
};

use crate::cli::TypeOverride;

pub struct ConvertArgs {
    pub files: Vec<PathBuf>,
    pub name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub tables: Vec<String>,
    pub add_index: bool,
    pub spatial: Vec<String>,
    pub types: Vec<TypeOverride>,
    pub config: Option<PathBuf>,
    pub show_progress: bool,
}

/// Progress bar over the rows of the table being written.
struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    fn new() -> Self {
        Self { bar: None }
    }
}

impl Progress for BarProgress {
    fn start(&mut self, table: &str, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:>16.cyan} [{bar:40}] {pos}/{len} rows ({per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message(table.to_string());
        self.bar = Some(bar);
    }

    fn advance(&mut self, written: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(written as u64);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

pub fn run(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.tables.len() > args.files.len() {
        return Err(format!(
            "{} table names given for {} files",
            args.tables.len(),
            args.files.len()
        )
        .into());
    }

    let mut config = match &args.config {
        Some(path) => ExtractConfig::load(path)?,
        None => ExtractConfig::default(),
    };
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    config.add_index |= args.add_index;

    let parser = CsvParser::new();
    let mut tables = Vec::with_capacity(args.files.len());
    for (i, file) in args.files.iter().enumerate() {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
        let (frame, source) = parser.parse_file(file)?;
        let name = args.tables.get(i).cloned().unwrap_or_else(|| source.stem());
        tracing::debug!(file = %file.display(), table = %name, "loaded input table");
        tables.push(ExtractTable::new(name, frame).with_source(source));
    }

    for column in &args.spatial {
        apply_to_matching(&mut tables, column, |table| table.set_spatial(column.as_str(), true))?;
    }
    for TypeOverride { column, target } in &args.types {
        apply_to_matching(&mut tables, column, |table| {
            table.set_type(column.as_str(), Some(*target))
        })?;
    }

    let name = match args.name {
        Some(name) => name,
        None => tables
            .first()
            .and_then(|t| t.source())
            .map(|s| s.stem())
            .ok_or("No input files")?,
    };

    let mut publisher = Publisher::with_config(name, config);
    for table in tables {
        publisher.add_table(table);
    }

    println!(
        "{} {} {}",
        "Publishing".cyan().bold(),
        publisher.tables().len(),
        if publisher.tables().len() == 1 { "table" } else { "tables" }
    );

    let report = if args.show_progress {
        publisher.publish_to_file(&mut BarProgress::new())?
    } else {
        publisher.publish_to_file(&mut NoProgress)?
    };

    println!();
    for table in &report.tables {
        let action = if table.created { "created" } else { "appended" };
        println!(
            "  {:20} {:>8} rows  {}",
            table.name.white().bold(),
            table.rows_written,
            action.green()
        );
        if table.degraded_cells > 0 {
            println!(
                "  {:20} {} cells could not be converted and were written as null",
                "",
                table.degraded_cells.to_string().yellow()
            );
        }
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        publisher.output_path().display().to_string().white()
    );

    Ok(())
}

/// Apply a column setting to every table that has the column.
fn apply_to_matching(
    tables: &mut [ExtractTable],
    column: &str,
    mut apply: impl FnMut(&mut ExtractTable) -> tabextract::Result<()>,
) -> tabextract::Result<()> {
    let mut matched = 0;
    for table in tables.iter_mut() {
        if table.frame().position(column).is_some() {
            apply(table)?;
            matched += 1;
        }
    }
    if matched == 0 {
        return Err(ExtractError::Lookup(format!(
            "no input table has a column named '{}'",
            column
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tabextract::sink::ExtractDocument;
    use tabextract::TargetType;
    use tempfile::{tempdir, NamedTempFile};

    fn csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(files: Vec<PathBuf>, output_dir: PathBuf) -> ConvertArgs {
        ConvertArgs {
            files,
            name: Some("out".into()),
            output_dir: Some(output_dir),
            tables: vec![],
            add_index: false,
            spatial: vec![],
            types: vec![],
            config: None,
            show_progress: false,
        }
    }

    #[test]
    fn test_convert_writes_extract() {
        let dir = tempdir().unwrap();
        let file = csv("id,location\n1,POINT (0 0)\n2,POINT (1 1)\n");

        let mut args = args(vec![file.path().to_path_buf()], dir.path().to_path_buf());
        args.tables = vec!["sites".into()];
        args.spatial = vec!["location".into()];
        args.add_index = true;
        run(args).unwrap();

        let document = ExtractDocument::load(dir.path().join("out.extract.json")).unwrap();
        let table = &document.tables["sites"];
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.schema.get("location"), Some(TargetType::Spatial));
        assert_eq!(table.schema.index_column(), Some("index"));
    }

    #[test]
    fn test_unknown_spatial_column_fails() {
        let dir = tempdir().unwrap();
        let file = csv("id\n1\n");

        let mut args = args(vec![file.path().to_path_buf()], dir.path().to_path_buf());
        args.spatial = vec!["geom".into()];
        assert!(run(args).is_err());
    }

    #[test]
    fn test_too_many_table_names() {
        let dir = tempdir().unwrap();
        let file = csv("id\n1\n");

        let mut args = args(vec![file.path().to_path_buf()], dir.path().to_path_buf());
        args.tables = vec!["a".into(), "b".into()];
        assert!(run(args).is_err());
    }
}
