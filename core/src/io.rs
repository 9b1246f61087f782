//! Loading and persisting schema documents as JSON.
//!
//! Output is indented with two spaces and ends with a newline. Property
//! order follows each node's own order and definitions are sorted by name,
//! so persisting the same document twice yields identical bytes.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::SchemaDocument;
use crate::error::{Result, SchemaError};

/// Reads and parses a schema document from `path`.
///
/// # Errors
///
/// Returns [`SchemaError::Read`] if the file cannot be read, or
/// [`SchemaError::Parse`] if its contents are not a schema document.
pub fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = serde_json::from_slice(&bytes).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "loaded schema");
    Ok(doc)
}

/// Parses a schema document from a JSON string.
///
/// # Examples
///
/// ```
/// use schema_merge_core::parse_schema;
///
/// let doc = parse_schema(r#"{"type": "object", "properties": {"a": {}}}"#).unwrap();
/// assert_eq!(doc.property_names(), vec!["a"]);
/// assert!(parse_schema("not json").is_err());
/// ```
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] with an empty path on malformed input.
pub fn parse_schema(text: &str) -> Result<SchemaDocument> {
    serde_json::from_str(text).map_err(|source| SchemaError::Parse {
        path: Default::default(),
        source,
    })
}

/// Renders `doc` as two-space indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`SchemaError::Serialize`] if encoding fails.
pub fn to_pretty_json(doc: &SchemaDocument) -> Result<String> {
    let mut text = serde_json::to_string_pretty(doc).map_err(SchemaError::Serialize)?;
    text.push('\n');
    Ok(text)
}

/// Writes `doc` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns [`SchemaError::Serialize`] if encoding fails, or
/// [`SchemaError::Write`] if the directory or file cannot be written.
pub fn persist(doc: &SchemaDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = to_pretty_json(doc)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SchemaError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text.as_bytes()).map_err(|source| SchemaError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "persisted schema");
    Ok(())
}
