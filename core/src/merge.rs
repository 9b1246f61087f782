//! Grafting a platform schema into a values schema.
//!
//! [`merge_platform_schema`] relocates the platform configuration type into
//! the host's definition table as `PlatformConfig` and wires it under the
//! host's top-level `external` property via an `ExternalConfig` definition.
//! It also unifies the definitions contributed by the authored platform
//! schema and by the reflected root-type document.
//!
//! # Example
//!
//! ```
//! use schema_merge_core::*;
//!
//! let platform = SchemaDocument::default()
//!     .with_property("project", SchemaDocument::typed("string"))
//!     .with_definition("PlatformAPIKey", SchemaDocument::object());
//! let root_type = SchemaDocument::object()
//!     .with_property("apiKey", SchemaDocument::reference_to("#/$defs/PlatformAPIKey"));
//! let mut host = SchemaDocument::object()
//!     .with_property("external", SchemaDocument::object());
//!
//! merge_platform_schema(&platform, &root_type, &mut host).unwrap();
//!
//! assert_eq!(
//!     host.property("external").unwrap().reference.as_deref(),
//!     Some(EXTERNAL_CONFIG_REF)
//! );
//! let node = host.definitions.get(PLATFORM_CONFIG_NAME).unwrap();
//! assert_eq!(node.property_names(), vec!["project", "apiKey"]);
//! ```

use tracing::{debug, info};

use crate::error::Result;
use crate::{Definitions, SchemaDocument};

/// Definition holding the grafted platform configuration type.
pub const PLATFORM_CONFIG_NAME: &str = "PlatformConfig";
/// Definition describing the host's `external` section.
pub const EXTERNAL_CONFIG_NAME: &str = "ExternalConfig";
pub const PLATFORM_CONFIG_REF: &str = "#/defs/PlatformConfig";
pub const EXTERNAL_CONFIG_REF: &str = "#/defs/ExternalConfig";

/// Definitions the merge engine creates and may replace.
pub const MANAGED_DEFINITIONS: [&str; 2] = [PLATFORM_CONFIG_NAME, EXTERNAL_CONFIG_NAME];

/// Top-level host property re-pointed at `ExternalConfig`.
pub const EXTERNAL_PROPERTY: &str = "external";
/// Property of `ExternalConfig` pointing at `PlatformConfig`.
pub const PLATFORM_PROPERTY: &str = "platform";

const PLATFORM_SCHEMA_ORIGIN: &str = "platform schema";
const MERGE_ENGINE_ORIGIN: &str = "merge engine";

/// Merges the platform schema into `host` in place.
///
/// `platform` is the authored platform schema. `root_type` is the document
/// reflected from the platform configuration type; its definitions may
/// include an entry for the type itself, which is skipped. Neither input is
/// modified and nothing from them is shared with `host`.
///
/// The host definitions are staged and only replaced once every step has
/// succeeded, so a failed merge leaves `host` unchanged.
///
/// # Errors
///
/// Returns [`SchemaError::DefinitionCollision`](crate::SchemaError::DefinitionCollision)
/// if a definition of the authored platform schema already exists in the
/// host, including one contributed by `root_type` or managed by the engine.
///
/// # Examples
///
/// ```
/// use schema_merge_core::*;
///
/// let platform = SchemaDocument::default().with_definition("Foo", SchemaDocument::object());
/// let mut host = SchemaDocument::default().with_definition("Foo", SchemaDocument::typed("string"));
///
/// let err = merge_platform_schema(&platform, &SchemaDocument::default(), &mut host).unwrap_err();
/// assert!(matches!(err, SchemaError::DefinitionCollision { ref name, .. } if name == "Foo"));
/// assert_eq!(host.definitions.len(), 1);
/// ```
pub fn merge_platform_schema(
    platform: &SchemaDocument,
    root_type: &SchemaDocument,
    host: &mut SchemaDocument,
) -> Result<()> {
    let platform_node = build_platform_node(platform, root_type);

    let mut definitions = host.definitions.clone();
    let host_count = definitions.len();

    let reflected = copy_reflected_definitions(root_type, &mut definitions);
    debug!(count = reflected, "copied reflected definitions");

    definitions.insert_unique(
        PLATFORM_CONFIG_NAME,
        platform_node,
        &MANAGED_DEFINITIONS,
        MERGE_ENGINE_ORIGIN,
    )?;
    install_external_config(&mut definitions)?;

    for (name, node) in &platform.definitions {
        definitions.insert_unique(name.as_str(), node.clone(), &[], PLATFORM_SCHEMA_ORIGIN)?;
    }
    debug!(
        count = platform.definitions.len(),
        "copied platform schema definitions"
    );

    host.definitions = definitions;

    let repointed = repoint_external_property(host);
    info!(
        host_definitions = host_count,
        merged_definitions = host.definitions.len(),
        external_repointed = repointed,
        "merged platform schema"
    );
    Ok(())
}

/// Builds the `PlatformConfig` definition from the authored properties
/// overlaid with the reflected ones.
///
/// A reflected property whose name is already present replaces the authored
/// value at the authored position; other reflected properties are appended
/// in reflected order.
fn build_platform_node(platform: &SchemaDocument, root_type: &SchemaDocument) -> SchemaDocument {
    let mut node = SchemaDocument::object()
        .with_description(format!("{PLATFORM_CONFIG_NAME} holds platform configuration"));
    node.properties = platform.properties.clone();

    for (name, property) in &root_type.properties {
        if node.properties.insert(name.clone(), property.clone()).is_some() {
            debug!(property = %name, "reflected property replaces authored property");
        }
    }
    node
}

fn copy_reflected_definitions(root_type: &SchemaDocument, definitions: &mut Definitions) -> usize {
    let mut copied = 0;
    for (name, node) in &root_type.definitions {
        if name == PLATFORM_CONFIG_NAME {
            continue;
        }
        definitions.insert(name.as_str(), node.clone());
        copied += 1;
    }
    copied
}

fn install_external_config(definitions: &mut Definitions) -> Result<()> {
    let platform_ref = SchemaDocument {
        reference: Some(PLATFORM_CONFIG_REF.to_string()),
        ..SchemaDocument::object()
    }
    .with_description(format!("{PLATFORM_PROPERTY} holds platform configuration"));
    let description = format!("{EXTERNAL_CONFIG_NAME} holds external configuration");

    match definitions.get_mut(EXTERNAL_CONFIG_NAME) {
        Some(existing) => {
            debug!("updating existing {EXTERNAL_CONFIG_NAME} definition");
            existing.properties.clear();
            existing
                .properties
                .insert(PLATFORM_PROPERTY.to_string(), platform_ref);
            existing.description = Some(description);
            existing.reference = Some(EXTERNAL_CONFIG_REF.to_string());
            Ok(())
        }
        None => {
            let node = SchemaDocument::reference_to(EXTERNAL_CONFIG_REF)
                .with_description(description)
                .with_property(PLATFORM_PROPERTY, platform_ref);
            definitions.insert_unique(
                EXTERNAL_CONFIG_NAME,
                node,
                &MANAGED_DEFINITIONS,
                MERGE_ENGINE_ORIGIN,
            )
        }
    }
}

/// Turns the host's `external` property into a pure reference.
///
/// Returns `false` when the host has no `external` property.
fn repoint_external_property(host: &mut SchemaDocument) -> bool {
    let Some(external) = host.properties.get_mut(EXTERNAL_PROPERTY) else {
        debug!("host has no `{EXTERNAL_PROPERTY}` property, leaving properties untouched");
        return false;
    };
    external.reference = Some(EXTERNAL_CONFIG_REF.to_string());
    external.additional_properties = None;
    // A reference node must not also carry an inline type.
    external.schema_type = None;
    true
}
