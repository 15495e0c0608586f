//! JSON extract files.
//!
//! An extract file holds every table of one extract together with its
//! schema:
//!
//! ```text
//! {
//!   "format_version": "1.0.0",
//!   "created_at": "...",
//!   "updated_at": "...",
//!   "tables": {
//!     "people": {
//!       "schema": { "columns": { "id": "integer", "name": "unicode_string" } },
//!       "rows": [[{ "type": "integer", "value": 1 }, { "type": "null" }]]
//!     }
//!   }
//! }
//! ```
//!
//! The file is only written when the sink is closed, through a temporary
//! file renamed into place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::convert::{Field, Row};
use crate::error::{ExtractError, Result};
use crate::schema::Schema;

use super::{check_row_width, ExtractSink, TableHandle};

/// File extension of extract files.
pub const EXTRACT_EXTENSION: &str = "extract.json";

/// Current extract format version.
pub const EXTRACT_FORMAT_VERSION: &str = "1.0.0";

/// Path of the extract named `name` inside `dir`.
///
/// # Example
///
/// ```
/// use tabextract::sink::extract_path;
///
/// let path = extract_path("out", "survey");
/// assert_eq!(path.to_string_lossy(), "out/survey.extract.json");
/// ```
pub fn extract_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.{}", name, EXTRACT_EXTENSION))
}

/// A stored table: its committed schema and rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTable {
    pub schema: Schema,
    #[serde(default)]
    pub rows: Vec<Vec<Field>>,
}

impl StoredTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Contents of an extract file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractDocument {
    pub format_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tables: IndexMap<String, StoredTable>,
}

impl ExtractDocument {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            format_version: EXTRACT_FORMAT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            tables: IndexMap::new(),
        }
    }

    /// Load an extract file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = serde_json::from_reader(BufReader::new(file))?;
        Ok(document)
    }

    /// Write the document through a temporary file in the same directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| ExtractError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let tmp = path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(io_err)?;
        drop(writer);

        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

impl Default for ExtractDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract sink backed by a JSON extract file.
///
/// Opening an existing file loads its tables, so a later run appends to
/// them under their committed schemas.
#[derive(Debug)]
pub struct JsonExtractSink {
    path: PathBuf,
    document: ExtractDocument,
    closed: bool,
}

impl JsonExtractSink {
    /// Open an extract file, loading it when it already exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let document = ExtractDocument::load(&path)?;
            tracing::debug!(
                path = %path.display(),
                tables = document.tables.len(),
                "opened existing extract"
            );
            document
        } else {
            ExtractDocument::new()
        };
        Ok(Self {
            path,
            document,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ExtractError::Sink(format!(
                "extract '{}' is closed",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Handle to a table of a [`JsonExtractSink`].
#[derive(Debug)]
pub struct JsonTableHandle<'a> {
    name: String,
    table: &'a mut StoredTable,
}

impl TableHandle for JsonTableHandle<'_> {
    fn schema(&self) -> &Schema {
        &self.table.schema
    }

    fn insert(&mut self, row: Row) -> Result<()> {
        check_row_width(&self.name, &self.table.schema, &row)?;
        self.table.rows.push(row.into_fields());
        Ok(())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

impl ExtractSink for JsonExtractSink {
    type Table<'a> = JsonTableHandle<'a>;

    fn table_exists(&self, name: &str) -> bool {
        self.document.tables.contains_key(name)
    }

    fn create_table<'a>(&'a mut self, name: &str, schema: &Schema) -> Result<Self::Table<'a>> {
        self.ensure_open()?;
        if self.document.tables.contains_key(name) {
            return Err(ExtractError::Sink(format!("table '{}' already exists", name)));
        }
        let table = self
            .document
            .tables
            .entry(name.to_string())
            .or_insert(StoredTable {
                schema: schema.clone(),
                rows: Vec::new(),
            });
        Ok(JsonTableHandle {
            name: name.to_string(),
            table,
        })
    }

    fn open_table<'a>(&'a mut self, name: &str) -> Result<Self::Table<'a>> {
        self.ensure_open()?;
        let table = self
            .document
            .tables
            .get_mut(name)
            .ok_or_else(|| ExtractError::Sink(format!("table '{}' does not exist", name)))?;
        Ok(JsonTableHandle {
            name: name.to_string(),
            table,
        })
    }

    fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.document.updated_at = Utc::now();
        self.document.save(&self.path)?;
        self.closed = true;
        tracing::debug!(path = %self.path.display(), "wrote extract");
        Ok(())
    }
}
