//! Platform configuration type and the values schema merge driver.
//!
//! This crate wires the collaborators around
//! [`schema_merge_core::merge_platform_schema`]:
//!
//! - [`PlatformConfig`] — the Rust type whose reflected schema enriches the
//!   authored platform schema.
//! - [`reflect_root_type`] — derives a root-type document from any
//!   [`schemars::JsonSchema`] type.
//! - [`MergeConfig`] — paths and options of one run, loadable from YAML.
//! - [`run_merge_schemas`] — loads both schemas, reflects, merges and
//!   persists the result.
//!
//! # Quick start
//!
//! ```no_run
//! use schema_merge_platform::{MergeConfig, run_merge_schemas};
//!
//! let config = MergeConfig::new(
//!     "chart/values.schema.json",
//!     "config/platform.schema.json",
//!     "chart/values.schema.json",
//! );
//! let summary = run_merge_schemas(&config).unwrap();
//! println!("{} definitions", summary.definition_count);
//! ```

mod config;
mod driver;
mod error;
mod reflect;
mod types;

pub use config::{DEFAULT_ROOT_TYPE_OUTPUT, MergeConfig};
pub use driver::{MergeSummary, reflect_platform_config, run_merge_schemas};
pub use error::{PlatformError, Result};
pub use reflect::{ReflectOptions, StripNullType, reflect_root_type};
pub use types::{PlatformApiKey, PlatformConfig};
