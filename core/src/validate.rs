//! Local reference checks.
//!
//! After a merge every local `$ref` should name an entry of the root
//! definition table. [`unresolved_references`] reports the ones that do not.
//! References are matched by definition name only; nothing is dereferenced
//! and non-local references (URLs, other pointers) are ignored.
//!
//! # Examples
//!
//! ```
//! use schema_merge_core::*;
//!
//! let doc = SchemaDocument::object()
//!     .with_property("a", SchemaDocument::reference_to("#/defs/Known"))
//!     .with_property("b", SchemaDocument::reference_to("#/$defs/Missing"))
//!     .with_definition("Known", SchemaDocument::object());
//!
//! let errors = unresolved_references(&doc);
//! assert_eq!(
//!     errors,
//!     vec![ValidationError::UnresolvedReference("#/$defs/Missing".to_string())]
//! );
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::{AdditionalProperties, SchemaDocument};

/// Pointer prefixes that address the root definition table.
pub const LOCAL_DEFINITION_PREFIXES: [&str; 3] = ["#/defs/", "#/$defs/", "#/definitions/"];

/// Reference validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A local `$ref` names a definition that does not exist.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),
}

/// Returns the definition name addressed by a local `$ref`, if any.
///
/// # Examples
///
/// ```
/// use schema_merge_core::definition_name;
///
/// assert_eq!(definition_name("#/defs/PlatformConfig"), Some("PlatformConfig"));
/// assert_eq!(definition_name("https://example.com/schema.json"), None);
/// ```
pub fn definition_name(pointer: &str) -> Option<&str> {
    LOCAL_DEFINITION_PREFIXES
        .iter()
        .find_map(|prefix| pointer.strip_prefix(prefix))
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

/// Reports local references that do not resolve against `doc.definitions`.
///
/// The whole document is searched, including keywords carried in
/// [`SchemaDocument::extra`]. Each unresolved pointer is reported once, in
/// the order first encountered.
pub fn unresolved_references(doc: &SchemaDocument) -> Vec<ValidationError> {
    let mut pointers = Vec::new();
    collect_document_references(doc, &mut pointers);

    let mut errors: Vec<ValidationError> = Vec::new();
    for pointer in pointers {
        let Some(name) = definition_name(pointer) else {
            continue;
        };
        if doc.definitions.contains(name) {
            continue;
        }
        let error = ValidationError::UnresolvedReference(pointer.to_string());
        if !errors.contains(&error) {
            errors.push(error);
        }
    }
    errors
}

fn collect_document_references<'a>(node: &'a SchemaDocument, out: &mut Vec<&'a str>) {
    if let Some(pointer) = &node.reference {
        out.push(pointer);
    }
    for property in node.properties.values() {
        collect_document_references(property, out);
    }
    if let Some(AdditionalProperties::Schema(policy)) = &node.additional_properties {
        collect_document_references(policy, out);
    }
    for value in node.extra.values() {
        collect_references(value, out);
    }
    for (_, definition) in &node.definitions {
        collect_document_references(definition, out);
    }
}

fn collect_references<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(pointer)) => out.push(pointer),
                    _ => collect_references(child, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_reports_refs_nested_in_unmodelled_keywords() {
        let doc: SchemaDocument = serde_json::from_value(json!({
            "properties": {
                "items": {
                    "type": "array",
                    "items": { "$ref": "#/$defs/Item" }
                },
                "choice": {
                    "anyOf": [{ "$ref": "#/definitions/Left" }, { "type": "null" }]
                }
            },
            "$defs": { "Left": { "type": "object" } }
        }))
        .unwrap();

        assert_eq!(
            unresolved_references(&doc),
            vec![ValidationError::UnresolvedReference(
                "#/$defs/Item".to_string()
            )]
        );
    }

    #[test]
    fn test_reports_refs_in_definitions_and_additional_properties() {
        let doc = SchemaDocument::object()
            .with_additional_properties(AdditionalProperties::Schema(Box::new(
                SchemaDocument::reference_to("#/defs/Value"),
            )))
            .with_definition(
                "Holder",
                SchemaDocument::object()
                    .with_property("inner", SchemaDocument::reference_to("#/$defs/Inner")),
            );

        assert_eq!(
            unresolved_references(&doc),
            vec![
                ValidationError::UnresolvedReference("#/defs/Value".to_string()),
                ValidationError::UnresolvedReference("#/$defs/Inner".to_string()),
            ]
        );
    }

    #[test]
    fn test_reports_each_pointer_once() {
        let doc = SchemaDocument::object()
            .with_property("a", SchemaDocument::reference_to("#/defs/Gone"))
            .with_property("b", SchemaDocument::reference_to("#/defs/Gone"));

        assert_eq!(unresolved_references(&doc).len(), 1);
    }

    #[test]
    fn test_ignores_non_local_refs() {
        let doc = SchemaDocument::object()
            .with_property(
                "remote",
                SchemaDocument::reference_to("https://example.com/values.schema.json"),
            )
            .with_property(
                "nested",
                SchemaDocument::reference_to("#/$defs/Known/properties/name"),
            );

        assert!(unresolved_references(&doc).is_empty());
    }

    #[test]
    fn test_definition_name_rejects_empty() {
        assert_eq!(definition_name("#/defs/"), None);
        assert_eq!(definition_name("#/$defs/Foo"), Some("Foo"));
    }
}
