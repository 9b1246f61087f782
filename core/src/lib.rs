//! Schema document model and the platform schema merge engine.
//!
//! This crate provides:
//!
//! - [`SchemaDocument`] — a structural model of a JSON Schema node with
//!   ordered properties, a [`Definitions`] namespace, and the scalar
//!   keywords the merge touches. Unmodelled keywords are carried verbatim.
//! - [`merge_platform_schema`] — grafts a platform schema and its reflected
//!   root type into a values schema, refusing to silently overwrite
//!   definitions.
//! - [`load_schema`] / [`persist`] — JSON file I/O with deterministic,
//!   two-space indented output.
//! - [`unresolved_references`] — reports local `$ref`s that name missing
//!   definitions.
//!
//! # Example
//!
//! ```
//! use schema_merge_core::*;
//!
//! let platform = parse_schema(r#"{
//!     "properties": { "project": { "type": "string" } },
//!     "$defs": { "AutoSleep": { "type": "object" } }
//! }"#).unwrap();
//! let root_type = SchemaDocument::object();
//! let mut values = parse_schema(r#"{
//!     "type": "object",
//!     "properties": { "external": { "type": "object" } }
//! }"#).unwrap();
//!
//! merge_platform_schema(&platform, &root_type, &mut values).unwrap();
//!
//! assert!(values.definitions.contains("AutoSleep"));
//! assert!(unresolved_references(&values).is_empty());
//! ```

mod document;
mod error;
mod io;
mod merge;
mod namespace;
mod validate;

pub use document::{AdditionalProperties, Properties, SchemaDocument};
pub use error::{Result, SchemaError};
pub use io::{load_schema, parse_schema, persist, to_pretty_json};
pub use merge::{
    EXTERNAL_CONFIG_NAME, EXTERNAL_CONFIG_REF, EXTERNAL_PROPERTY, MANAGED_DEFINITIONS,
    PLATFORM_CONFIG_NAME, PLATFORM_CONFIG_REF, PLATFORM_PROPERTY, merge_platform_schema,
};
pub use namespace::Definitions;
pub use validate::{
    LOCAL_DEFINITION_PREFIXES, ValidationError, definition_name, unresolved_references,
};
