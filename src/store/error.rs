use std::fmt;
use std::io;
use std::path::PathBuf;

use super::Kind;

/// Errors raised by [`Store`](super::Store) operations.
///
/// A malformed backing file is never reset automatically; the operation
/// fails and the file is left as it was found.
#[derive(Debug)]
pub enum StoreError {
    /// Reading, creating or writing a collection file failed
    Io {
        /// Path of the collection file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The collection file does not contain valid JSON
    Malformed {
        /// Path of the collection file
        path: PathBuf,
        /// Parser error
        source: serde_json::Error,
    },
    /// The collection file holds valid JSON whose top-level value is not an
    /// array of objects
    NotAnArray {
        /// Path of the collection file
        path: PathBuf,
    },
    /// A record could not be converted to or from its entity type
    InvalidRecord {
        /// Kind of the offending record
        kind: Kind,
        /// Conversion error
        source: serde_json::Error,
    },
    /// `save` was called with an id that is not present in the collection
    UnknownId {
        /// Kind of the collection
        kind: Kind,
        /// The id that was not found
        id: u64,
    },
    /// The collection already holds the largest representable id
    IdExhausted {
        /// Kind of the collection
        kind: Kind,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "storage I/O error on {}: {}", path.display(), source)
            }
            StoreError::Malformed { path, source } => {
                write!(f, "malformed collection file {}: {}", path.display(), source)
            }
            StoreError::NotAnArray { path } => write!(
                f,
                "collection file {} must contain a JSON array of objects",
                path.display()
            ),
            StoreError::InvalidRecord { kind, source } => {
                write!(f, "invalid {} record: {}", kind, source)
            }
            StoreError::UnknownId { kind, id } => {
                write!(f, "no {} record with id {} to replace", kind, id)
            }
            StoreError::IdExhausted { kind } => {
                write!(f, "no {} id left to assign", kind)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Malformed { source, .. } | StoreError::InvalidRecord { source, .. } => {
                Some(source)
            }
            StoreError::NotAnArray { .. }
            | StoreError::UnknownId { .. }
            | StoreError::IdExhausted { .. } => None,
        }
    }
}
