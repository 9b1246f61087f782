//! Error types for the merge driver.
//!
//! Wraps the core [`SchemaError`] and adds failures specific to reflection
//! and run configuration.

use std::path::PathBuf;

use schema_merge_core::SchemaError;
use thiserror::Error;

/// Errors that can occur while reflecting, configuring or running a merge.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Loading, merging or persisting a schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The reflected type could not be converted into a schema document.
    #[error("failed to reflect {type_name}: {source}")]
    Reflect {
        type_name: String,
        source: serde_json::Error,
    },

    /// Run configuration file could not be read or written.
    #[error("config I/O error for {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Run configuration is not valid YAML for [`MergeConfig`](crate::MergeConfig).
    #[error("invalid config {}: {source}", .path.display())]
    ConfigYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A required run setting was not provided.
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),
}

/// Convenience alias for results with [`PlatformError`].
pub type Result<T> = std::result::Result<T, PlatformError>;
