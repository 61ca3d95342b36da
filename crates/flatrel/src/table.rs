//! The schema/file binding a relation queries against.
//!
//! A [`Table`] couples a file path with its field separator and the column
//! names read once from the header row. It is immutable after construction
//! and shared via [`Arc`] by every [`Relation`](crate::Relation) and
//! [`Row`](crate::Row) built from it; pointing a model at a different file
//! means constructing a new `Table`, not mutating an existing one.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::relation::Relation;

/// The default field separator: a horizontal tab.
pub const DEFAULT_SEPARATOR: u8 = b'\t';

/// An immutable binding of a delimited flat file to its schema.
///
/// # Example
///
/// ```no_run
/// use flatrel::Table;
///
/// # fn main() -> flatrel::Result<()> {
/// let users = Table::open("data/users.tsv")?;
/// assert_eq!(users.columns(), &["id", "name", "age"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct Table {
    path: PathBuf,
    separator: u8,
    columns: Vec<String>,
}

impl Table {
    /// Opens a tab-separated table, reading its header row eagerly.
    ///
    /// I/O errors (missing file, permissions) propagate unchanged; a file
    /// with no header row is [`Error::MissingHeader`].
    pub fn open(path: impl AsRef<Path>) -> Result<Arc<Table>> {
        Table::open_with_separator(path, DEFAULT_SEPARATOR)
    }

    /// Opens a table with an explicit single-byte field separator.
    pub fn open_with_separator(path: impl AsRef<Path>, separator: u8) -> Result<Arc<Table>> {
        let path = path.as_ref().to_path_buf();
        let mut reader = open_reader(&path, separator)?;
        let mut header = csv::StringRecord::new();
        if !reader.read_record(&mut header)? {
            return Err(Error::MissingHeader { path });
        }
        Ok(Arc::new(Table {
            path,
            separator,
            columns: header.iter().map(String::from).collect(),
        }))
    }

    /// Returns the column names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the field separator byte.
    pub fn separator(&self) -> u8 {
        self.separator
    }

    /// Opens a fresh sequential reader over the backing file.
    ///
    /// The reader is positioned so its first record is the header row;
    /// callers skip it themselves. Every terminal operation opens its own
    /// reader, and the file handle closes when the reader is dropped.
    pub fn reader(&self) -> Result<csv::Reader<File>> {
        open_reader(&self.path, self.separator)
    }

    /// Builds the column-name to field-index lookup.
    ///
    /// Constructed once per query execution, not cached on the table.
    pub(crate) fn column_index(&self) -> HashMap<String, usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect()
    }

    /// Returns the empty relation over this table.
    pub fn all(self: &Arc<Self>) -> Relation {
        Relation::new(Arc::clone(self))
    }
}

fn open_reader(path: &Path, separator: u8) -> Result<csv::Reader<File>> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(true)
        .from_reader(file))
}
