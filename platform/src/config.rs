//! Run configuration for the merge driver.
//!
//! A [`MergeConfig`] names the input and output files of one merge run. It
//! can be built in code, loaded from YAML, or assembled from CLI flags on
//! top of a YAML file.
//!
//! # Example YAML
//!
//! ```yaml
//! values_schema: chart/values.schema.json
//! platform_schema: config/platform.schema.json
//! output: chart/values.schema.json
//! root_type_output: here.platform.schema.json
//! base_schema_id: https://example.com/schemas
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// Default location of the reflected root-type artifact.
pub const DEFAULT_ROOT_TYPE_OUTPUT: &str = "here.platform.schema.json";

fn default_root_type_output() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT_TYPE_OUTPUT)
}

/// Paths and options for a single merge run.
///
/// # Examples
///
/// ```
/// use schema_merge_platform::{DEFAULT_ROOT_TYPE_OUTPUT, MergeConfig};
///
/// let config = MergeConfig::new("values.schema.json", "platform.schema.json", "out.json");
/// assert_eq!(config.root_type_output.to_str(), Some(DEFAULT_ROOT_TYPE_OUTPUT));
/// assert!(config.base_schema_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Host document being extended.
    pub values_schema: PathBuf,
    /// Authored platform schema grafted into the host.
    pub platform_schema: PathBuf,
    /// Where the merged document is written.
    pub output: PathBuf,
    /// Where the unmerged reflected root type is written for inspection.
    #[serde(default = "default_root_type_output")]
    pub root_type_output: PathBuf,
    /// Written as `$id` of the reflected root type when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_schema_id: Option<String>,
}

impl MergeConfig {
    /// Creates a configuration with the default root-type artifact path.
    pub fn new(
        values_schema: impl Into<PathBuf>,
        platform_schema: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            values_schema: values_schema.into(),
            platform_schema: platform_schema.into(),
            output: output.into(),
            root_type_output: default_root_type_output(),
            base_schema_id: None,
        }
    }

    /// Sets the root-type artifact path.
    pub fn with_root_type_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_type_output = path.into();
        self
    }

    /// Sets the `$id` written on the reflected root type.
    pub fn with_base_schema_id(mut self, id: impl Into<String>) -> Self {
        self.base_schema_id = Some(id.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIo`](PlatformError::ConfigIo) if the file cannot be
    /// read, or [`ConfigYaml`](PlatformError::ConfigYaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| PlatformError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|source| PlatformError::ConfigYaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIo`](PlatformError::ConfigIo) if the file cannot be
    /// created, or [`ConfigYaml`](PlatformError::ConfigYaml) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| PlatformError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self).map_err(|source| PlatformError::ConfigYaml {
            path: path.to_path_buf(),
            source,
        })
    }
}
