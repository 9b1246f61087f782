//! Structural model of a JSON Schema document.
//!
//! [`SchemaDocument`] models only the keywords the merge engine touches:
//! `properties`, `$defs`, `type`, `description`, `$ref` and
//! `additionalProperties`. Every other keyword is kept verbatim in
//! [`SchemaDocument::extra`] so a document survives a load/persist cycle
//! without losing content the engine does not understand.

use std::fmt;

use indexmap::IndexMap;
use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::namespace::Definitions;

/// Ordered property table.
///
/// Iteration follows insertion order. Inserting an existing name replaces
/// the value in place; new names are appended.
pub type Properties = IndexMap<String, SchemaDocument>;

/// The `additionalProperties` policy of a node.
///
/// Absence of the keyword is modelled as `Option::None` on
/// [`SchemaDocument::additional_properties`].
///
/// # Examples
///
/// ```
/// use schema_merge_core::AdditionalProperties;
///
/// let closed: AdditionalProperties = serde_json::from_str("false").unwrap();
/// assert!(closed.is_disallowed());
///
/// let typed: AdditionalProperties = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
/// assert!(matches!(typed, AdditionalProperties::Schema(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// Boolean form. `false` forbids undeclared keys.
    Allowed(bool),
    /// Undeclared keys must match this schema.
    Schema(Box<SchemaDocument>),
}

impl AdditionalProperties {
    /// Returns `true` for `additionalProperties: false`.
    pub fn is_disallowed(&self) -> bool {
        matches!(self, Self::Allowed(false))
    }
}

/// In-memory JSON Schema node.
///
/// # Examples
///
/// ```
/// use schema_merge_core::SchemaDocument;
///
/// let doc = SchemaDocument::object()
///     .with_description("Values holds the chart values")
///     .with_property("replicas", SchemaDocument::typed("integer"));
///
/// assert_eq!(doc.schema_type.as_deref(), Some("object"));
/// assert!(doc.property("replicas").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    /// Reference target, e.g. `#/defs/PlatformConfig`.
    pub reference: Option<String>,
    /// Named definitions shared by the whole document.
    pub definitions: Definitions,
    /// Named properties in authored order.
    pub properties: Properties,
    pub additional_properties: Option<AdditionalProperties>,
    pub schema_type: Option<String>,
    pub description: Option<String>,
    /// Keywords outside the modelled subset, in input order.
    pub extra: Map<String, Value>,
    /// Set when the node was written as a boolean schema (`true`/`false`).
    ///
    /// The node is written back as that boolean as long as no other field
    /// has been set on it.
    pub boolean_schema: Option<bool>,
}

/// Object form of a schema node as it appears on the wire.
#[derive(Deserialize)]
struct SchemaObject {
    #[serde(rename = "$ref", default)]
    reference: Option<String>,
    #[serde(rename = "$defs", alias = "definitions", default)]
    definitions: Definitions,
    #[serde(default)]
    properties: Properties,
    #[serde(rename = "additionalProperties", default)]
    additional_properties: Option<AdditionalProperties>,
    #[serde(rename = "type", default)]
    schema_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<SchemaObject> for SchemaDocument {
    fn from(object: SchemaObject) -> Self {
        Self {
            reference: object.reference,
            definitions: object.definitions,
            properties: object.properties,
            additional_properties: object.additional_properties,
            schema_type: object.schema_type,
            description: object.description,
            extra: object.extra,
            boolean_schema: None,
        }
    }
}

impl<'de> Deserialize<'de> for SchemaDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SchemaVisitor)
    }
}

struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = SchemaDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a schema object or boolean")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(SchemaDocument {
            boolean_schema: Some(value),
            ..SchemaDocument::default()
        })
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        SchemaObject::deserialize(MapAccessDeserializer::new(map)).map(SchemaDocument::from)
    }
}

impl Serialize for SchemaDocument {
    /// Writes `$`-prefixed unmodelled keywords (`$schema`, `$id`, ...) first,
    /// then the modelled keywords, then the remaining unmodelled ones.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(value) = self.boolean_schema.filter(|_| self.has_no_keywords()) {
            return serializer.serialize_bool(value);
        }

        let (dollar, plain): (Vec<_>, Vec<_>) =
            self.extra.iter().partition(|(key, _)| key.starts_with('$'));

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in dollar {
            map.serialize_entry(key, value)?;
        }
        if let Some(reference) = &self.reference {
            map.serialize_entry("$ref", reference)?;
        }
        if !self.definitions.is_empty() {
            map.serialize_entry("$defs", &self.definitions)?;
        }
        if !self.properties.is_empty() {
            map.serialize_entry("properties", &self.properties)?;
        }
        if let Some(policy) = &self.additional_properties {
            map.serialize_entry("additionalProperties", policy)?;
        }
        if let Some(schema_type) = &self.schema_type {
            map.serialize_entry("type", schema_type)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        for (key, value) in plain {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl SchemaDocument {
    /// Creates an empty node with `type: "object"`.
    pub fn object() -> Self {
        Self::typed("object")
    }

    /// Creates an empty node with the given scalar `type`.
    pub fn typed(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    /// Creates a reference node pointing at `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_merge_core::SchemaDocument;
    ///
    /// let node = SchemaDocument::reference_to("#/defs/ExternalConfig");
    /// assert_eq!(node.reference.as_deref(), Some("#/defs/ExternalConfig"));
    /// assert!(node.schema_type.is_none());
    /// ```
    pub fn reference_to(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends (or replaces in place) a property.
    pub fn with_property(mut self, name: impl Into<String>, node: SchemaDocument) -> Self {
        self.properties.insert(name.into(), node);
        self
    }

    /// Adds a definition, replacing any entry of the same name.
    pub fn with_definition(mut self, name: impl Into<String>, node: SchemaDocument) -> Self {
        self.definitions.insert(name, node);
        self
    }

    /// Sets the `additionalProperties` policy.
    pub fn with_additional_properties(mut self, policy: AdditionalProperties) -> Self {
        self.additional_properties = Some(policy);
        self
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&SchemaDocument> {
        self.properties.get(name)
    }

    /// Returns property names in document order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    /// Returns `true` if no keyword is set on this node.
    pub fn has_no_keywords(&self) -> bool {
        self.reference.is_none()
            && self.definitions.is_empty()
            && self.properties.is_empty()
            && self.additional_properties.is_none()
            && self.schema_type.is_none()
            && self.description.is_none()
            && self.extra.is_empty()
    }

    /// Returns `true` if this node is a reference rather than an inline schema.
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_accepts_definitions_alias() {
        let doc: SchemaDocument = serde_json::from_value(json!({
            "definitions": { "Foo": { "type": "string" } }
        }))
        .unwrap();

        assert!(doc.definitions.contains("Foo"));
        let out = serde_json::to_value(&doc).unwrap();
        assert!(out.get("$defs").is_some());
        assert!(out.get("definitions").is_none());
    }

    #[test]
    fn test_unknown_keywords_survive_round_trip() {
        let input = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": {
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["tags"]
        });
        let doc: SchemaDocument = serde_json::from_value(input).unwrap();

        assert_eq!(doc.extra.get("required"), Some(&json!(["tags"])));
        let tags = doc.property("tags").unwrap();
        assert_eq!(tags.extra.get("items"), Some(&json!({ "type": "string" })));

        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            out["$schema"],
            json!("https://json-schema.org/draft/2020-12/schema")
        );
        assert_eq!(out["properties"]["tags"]["items"]["type"], json!("string"));
    }

    #[test]
    fn test_property_order_follows_input() {
        let doc: SchemaDocument = serde_json::from_str(
            r#"{"properties": {"zeta": {}, "alpha": {}, "mid": {}}}"#,
        )
        .unwrap();
        assert_eq!(doc.property_names(), vec!["zeta", "alpha", "mid"]);

        let text = serde_json::to_string(&doc).unwrap();
        let zeta = text.find("zeta").unwrap();
        let alpha = text.find("alpha").unwrap();
        let mid = text.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_additional_properties_tri_state() {
        let unset: SchemaDocument = serde_json::from_str("{}").unwrap();
        assert!(unset.additional_properties.is_none());

        let closed: SchemaDocument =
            serde_json::from_str(r#"{"additionalProperties": false}"#).unwrap();
        assert!(closed.additional_properties.unwrap().is_disallowed());

        let constrained: SchemaDocument =
            serde_json::from_str(r#"{"additionalProperties": {"type": "integer"}}"#).unwrap();
        match constrained.additional_properties {
            Some(AdditionalProperties::Schema(node)) => {
                assert_eq!(node.schema_type.as_deref(), Some("integer"));
            }
            other => panic!("unexpected policy: {other:?}"),
        }
    }

    #[test]
    fn test_dollar_keywords_are_written_first() {
        let doc: SchemaDocument = serde_json::from_value(json!({
            "title": "PlatformConfig",
            "description": "reflected",
            "type": "object",
            "$id": "https://example.com/schemas",
            "$schema": "https://json-schema.org/draft/2020-12/schema"
        }))
        .unwrap();

        let out = serde_json::to_value(&doc).unwrap();
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["$id", "$schema", "type", "description", "title"]);
    }

    #[test]
    fn test_boolean_schemas_round_trip() {
        let input = json!({
            "properties": { "anything": true, "nothing": false },
            "$defs": { "Open": true },
            "additionalProperties": false
        });
        let doc: SchemaDocument = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(doc.property("anything").unwrap().boolean_schema, Some(true));
        assert_eq!(doc.definitions.get("Open").unwrap().boolean_schema, Some(true));
        assert!(doc.additional_properties.as_ref().unwrap().is_disallowed());
        assert_eq!(serde_json::to_value(&doc).unwrap(), input);
    }

    #[test]
    fn test_boolean_schema_with_keywords_is_written_as_object() {
        let mut doc: SchemaDocument = serde_json::from_str("true").unwrap();
        doc.reference = Some("#/defs/ExternalConfig".to_string());

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "$ref": "#/defs/ExternalConfig" })
        );
    }

    #[test]
    fn test_non_schema_values_are_rejected() {
        assert!(serde_json::from_str::<SchemaDocument>("42").is_err());
        assert!(serde_json::from_str::<SchemaDocument>(r#"{"type": ["a", "b"]}"#).is_err());
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let out = serde_json::to_value(SchemaDocument::default()).unwrap();
        assert_eq!(out, json!({}));
    }
}
