use std::fmt;
use std::io;

use crate::store::StoreError;

/// Failure inside a route handler.
///
/// The router logs it and answers 500; it never reaches the accept loop.
#[derive(Debug)]
pub enum Error {
    /// A record store operation failed
    Store(StoreError),
    /// A page template or static asset could not be read
    Asset {
        /// Requested asset name
        name: String,
        /// Underlying I/O error
        source: io::Error,
    },
}

impl Error {
    pub fn asset(name: impl Into<String>, source: io::Error) -> Self {
        Error::Asset {
            name: name.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "store error: {}", e),
            Error::Asset { name, source } => write!(f, "cannot read asset '{}': {}", name, source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => Some(e),
            Error::Asset { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}
