//! Error types for the flatrel crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when building or executing table queries.
#[derive(Debug, Error)]
pub enum Error {
    /// Direction token is not a recognized ordering direction.
    #[error("direction \"{token}\" is invalid; valid directions are: asc, desc")]
    InvalidDirection {
        /// The rejected token.
        token: String,
    },

    /// Attribute name is not a column of the table.
    #[error("unknown attribute \"{name}\"")]
    UnknownAttribute {
        /// The offending attribute name.
        name: String,
    },

    /// A condition references a column the table does not declare.
    #[error("unknown column \"{name}\" in condition")]
    UnknownColumn {
        /// The offending column name.
        name: String,
    },

    /// The backing file has no header row.
    #[error("no header row in {}", path.display())]
    MissingHeader {
        /// Path of the headerless file.
        path: PathBuf,
    },

    /// I/O error from the backing file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited record.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for flatrel operations.
pub type Result<T> = std::result::Result<T, Error>;
