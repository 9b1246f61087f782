//! The flat definition namespace shared by every merged document.
//!
//! Definition names are unique across the final document. Writes go through
//! either [`Definitions::insert`] (unconditional) or
//! [`Definitions::insert_unique`], which refuses to replace an existing entry
//! unless its name is on an explicit allow-list.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::SchemaDocument;
use crate::error::{Result, SchemaError};

/// Named definitions, ordered by name.
///
/// # Examples
///
/// ```
/// use schema_merge_core::{Definitions, SchemaDocument, SchemaError};
///
/// let mut defs = Definitions::new();
/// defs.insert_unique("Foo", SchemaDocument::object(), &[], "platform schema").unwrap();
///
/// let err = defs
///     .insert_unique("Foo", SchemaDocument::typed("string"), &[], "platform schema")
///     .unwrap_err();
/// assert!(matches!(err, SchemaError::DefinitionCollision { .. }));
///
/// // Names on the allow-list may be replaced.
/// defs.insert_unique("Foo", SchemaDocument::typed("string"), &["Foo"], "merge engine").unwrap();
/// assert_eq!(defs.get("Foo").unwrap().schema_type.as_deref(), Some("string"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definitions(BTreeMap<String, SchemaDocument>);

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaDocument> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SchemaDocument> {
        self.0.get_mut(name)
    }

    /// Returns definition names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SchemaDocument> {
        self.0.iter()
    }

    /// Inserts `node` under `name`, returning the entry it replaced.
    pub fn insert(&mut self, name: impl Into<String>, node: SchemaDocument) -> Option<SchemaDocument> {
        self.0.insert(name.into(), node)
    }

    /// Inserts `node` under `name` unless another entry already holds it.
    ///
    /// Names listed in `overwritable` may be replaced. `origin` names the
    /// document the definition came from and is carried into the error.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DefinitionCollision`] if `name` is taken and
    /// not overwritable. The existing entry is left untouched.
    pub fn insert_unique(
        &mut self,
        name: impl Into<String>,
        node: SchemaDocument,
        overwritable: &[&str],
        origin: &str,
    ) -> Result<()> {
        let name = name.into();
        if self.0.contains_key(&name) && !overwritable.contains(&name.as_str()) {
            return Err(SchemaError::DefinitionCollision {
                name,
                origin: origin.to_string(),
            });
        }
        self.0.insert(name, node);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Definitions {
    type Item = (&'a String, &'a SchemaDocument);
    type IntoIter = btree_map::Iter<'a, String, SchemaDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, SchemaDocument)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (String, SchemaDocument)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
