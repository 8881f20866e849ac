//! Document loading errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a document from disk.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be opened.
    #[error("fopen {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but reading it failed part-way.
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
