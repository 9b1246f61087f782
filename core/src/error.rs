//! Error types for schema loading, merging and persisting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, merging or writing schema documents.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Input file could not be read.
    #[error("failed to read schema {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input bytes are not a schema document.
    #[error("failed to parse schema {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A definition would silently replace one already in the host.
    #[error("definition `{name}` from the {origin} already exists in the host schema")]
    DefinitionCollision { name: String, origin: String },

    /// Document could not be encoded as JSON.
    #[error("failed to serialize schema: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Output file or its parent directory could not be written.
    #[error("failed to write schema {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
