//! End-to-end merge run: load, reflect, merge, persist.

use schema_merge_core::{
    SchemaDocument, ValidationError, load_schema, merge_platform_schema, persist,
    unresolved_references,
};
use tracing::{info, warn};

use crate::config::MergeConfig;
use crate::error::Result;
use crate::reflect::{ReflectOptions, reflect_root_type};
use crate::types::PlatformConfig;

/// Outcome of a successful merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Definitions in the merged document.
    pub definition_count: usize,
    /// Top-level properties in the merged document.
    pub property_count: usize,
    /// Local references in the output that name no definition.
    pub unresolved: Vec<ValidationError>,
}

/// Runs a full merge as described by `config`.
///
/// The platform schema is loaded before the values schema. The reflected
/// [`PlatformConfig`] document is written to `config.root_type_output`
/// before merging. Any failure aborts the run; an output file written by an
/// earlier step is left in place.
///
/// # Errors
///
/// Returns the first load, reflection, collision or write failure.
pub fn run_merge_schemas(config: &MergeConfig) -> Result<MergeSummary> {
    let platform = load_schema(&config.platform_schema)?;
    let mut values = load_schema(&config.values_schema)?;

    let root_type = reflect_platform_config(config)?;
    persist(&root_type, &config.root_type_output)?;
    info!(path = %config.root_type_output.display(), "wrote reflected root type");

    merge_platform_schema(&platform, &root_type, &mut values)?;
    persist(&values, &config.output)?;

    let unresolved = unresolved_references(&values);
    for error in &unresolved {
        warn!(%error, "merged schema has a dangling reference");
    }
    info!(
        path = %config.output.display(),
        definitions = values.definitions.len(),
        "wrote merged schema"
    );

    Ok(MergeSummary {
        definition_count: values.definitions.len(),
        property_count: values.properties.len(),
        unresolved,
    })
}

/// Reflects [`PlatformConfig`] with the options from `config`.
///
/// # Errors
///
/// Returns [`PlatformError::Reflect`](crate::PlatformError::Reflect) if
/// reflection fails.
pub fn reflect_platform_config(config: &MergeConfig) -> Result<SchemaDocument> {
    let options = ReflectOptions {
        base_schema_id: config.base_schema_id.clone(),
    };
    reflect_root_type::<PlatformConfig>(&options)
}
