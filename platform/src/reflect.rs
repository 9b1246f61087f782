//! Reflecting a Rust type into a root-type schema document.
//!
//! [`reflect_root_type`] derives a [`SchemaDocument`] from a type's
//! [`JsonSchema`] implementation. Doc comments become descriptions and every
//! type reachable from the root lands in the definition table, along with an
//! entry for the root type itself keyed by its own name.

use schema_merge_core::SchemaDocument;
use schemars::generate::SchemaSettings;
use schemars::transform::Transform;
use schemars::{JsonSchema, Schema};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{PlatformError, Result};

/// Options controlling reflection output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectOptions {
    /// Written as `$id` of the root document when set.
    pub base_schema_id: Option<String>,
}

/// Collapses the `null` alternatives schemars emits for `Option<T>`.
///
/// `"type": ["string", "null"]` becomes `"type": "string"` and
/// `"anyOf": [S, {"type": "null"}]` is replaced by the keywords of `S`.
/// Applies to every nested subschema, including `$defs`.
///
/// # Examples
///
/// ```
/// use schema_merge_platform::StripNullType;
/// use schemars::json_schema;
/// use schemars::transform::Transform;
///
/// let mut schema = json_schema!({ "type": ["boolean", "null"] });
/// StripNullType.transform(&mut schema);
/// assert_eq!(schema, json_schema!({ "type": "boolean" }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StripNullType;

impl Transform for StripNullType {
    fn transform(&mut self, schema: &mut Schema) {
        if let Some(object) = schema.as_object_mut() {
            strip_null_object(object);
        }
    }
}

fn strip_null_value(value: &mut Value) {
    match value {
        Value::Object(object) => strip_null_object(object),
        Value::Array(items) => items.iter_mut().for_each(strip_null_value),
        _ => {}
    }
}

fn strip_null_object(object: &mut Map<String, Value>) {
    let collapsed = match object.get_mut("type") {
        Some(Value::Array(types)) => {
            types.retain(|t| t != "null");
            (types.len() == 1).then(|| types[0].clone())
        }
        _ => None,
    };
    if let Some(single) = collapsed {
        object.insert("type".to_string(), single);
    }

    let null = json!({ "type": "null" });
    let inner = match object.get("anyOf") {
        Some(Value::Array(variants)) if variants.len() == 2 => variants
            .iter()
            .position(|variant| *variant == null)
            .map(|index| variants[1 - index].clone()),
        _ => None,
    };
    if let Some(Value::Object(inner)) = inner {
        object.shift_remove("anyOf");
        for (key, value) in inner {
            object.entry(key).or_insert(value);
        }
    }

    object.values_mut().for_each(strip_null_value);
}

/// Reflects `T` into a root-type document.
///
/// `Option<T>` fields are described by the schema of `T` (see
/// [`StripNullType`]), so every `type` keyword stays a scalar.
///
/// # Errors
///
/// Returns [`PlatformError::Reflect`] if the generated schema is not
/// representable as a [`SchemaDocument`].
///
/// # Examples
///
/// ```
/// use schema_merge_platform::{PlatformConfig, ReflectOptions, reflect_root_type};
///
/// let doc = reflect_root_type::<PlatformConfig>(&ReflectOptions::default()).unwrap();
/// assert_eq!(doc.property_names(), vec!["apiKey", "project"]);
/// assert!(doc.definitions.contains("PlatformConfig"));
/// assert!(doc.definitions.contains("PlatformAPIKey"));
/// ```
pub fn reflect_root_type<T: JsonSchema>(options: &ReflectOptions) -> Result<SchemaDocument> {
    let type_name = T::schema_name().into_owned();
    let generator = SchemaSettings::draft2020_12().into_generator();
    let mut schema = generator.into_root_schema_for::<T>();
    StripNullType.transform(&mut schema);

    let value: Value = serde_json::to_value(&schema).map_err(|source| PlatformError::Reflect {
        type_name: type_name.clone(),
        source,
    })?;
    let mut doc: SchemaDocument =
        serde_json::from_value(value).map_err(|source| PlatformError::Reflect {
            type_name: type_name.clone(),
            source,
        })?;

    if let Some(id) = &options.base_schema_id {
        doc.extra.insert("$id".to_string(), Value::String(id.clone()));
    }

    let mut root_entry = doc.clone();
    root_entry.definitions = Default::default();
    root_entry.extra.retain(|key, _| !key.starts_with('$'));
    doc.definitions.insert(type_name.as_str(), root_entry);

    debug!(
        root = %type_name,
        properties = doc.properties.len(),
        definitions = doc.definitions.len(),
        "reflected root type"
    );
    Ok(doc)
}
