//! # Attribute Schemas
//!
//! A [`Schema`] is the declarative core of an entity type: an ordered list of
//! attribute names, some with defaults, registered once per type and shared by
//! every instance. The schema drives argument binding (see [`crate::entity`]),
//! so adding an attribute to the declaration is all it takes to accept a new
//! payload field.
//!
//! Schemas are built through [`SchemaBuilder`] and usually stored in a
//! `once_cell::sync::Lazy` static:
//!
//! ```
//! use chat_model::Schema;
//! use once_cell::sync::Lazy;
//!
//! static MESSAGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
//!     Schema::builder("Message")
//!         .attr("id")
//!         .attr("userId")
//!         .attr("content")
//!         .build()
//!         .expect("Message schema is valid")
//! });
//! # assert_eq!(MESSAGE_SCHEMA.len(), 3);
//! ```

use crate::error::ModelError;
use serde_json::Value;
use std::collections::HashSet;

/// A single declared attribute: its field name and an optional default bound
/// when construction leaves the attribute unset.
#[derive(Debug, Clone)]
pub struct Attr {
    name: &'static str,
    default: Option<Value>,
}

impl Attr {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// An entity type's attribute declaration.
///
/// Attribute order is binding order: positional arguments match attributes
/// left to right. Names are unique; [`SchemaBuilder::build`] rejects
/// duplicates. Defaults can only be attached at declaration, so every default
/// names a declared attribute by construction.
#[derive(Debug, Clone)]
pub struct Schema {
    entity: &'static str,
    attrs: Vec<Attr>,
}

impl Schema {
    /// Starts a builder for the named entity type.
    pub fn builder(entity: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            entity,
            attrs: Vec::new(),
        }
    }

    /// The entity type name, used in error messages and logs.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Declared attribute names, in binding order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attrs.iter().map(Attr::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of the named attribute in binding order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.attrs.iter().position(|attr| attr.name == name)
    }

    /// The declared default for an attribute, if any.
    pub fn default_of(&self, name: &str) -> Option<&Value> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.default.as_ref())
    }
}

/// Builder for [`Schema`]. Declaration order is preserved.
pub struct SchemaBuilder {
    entity: &'static str,
    attrs: Vec<Attr>,
}

impl SchemaBuilder {
    /// Declares an attribute with no default. Unbound at construction, it
    /// holds `Value::Null`.
    pub fn attr(mut self, name: &'static str) -> Self {
        self.attrs.push(Attr {
            name,
            default: None,
        });
        self
    }

    /// Declares an attribute with a default bound when construction leaves it
    /// unset.
    pub fn attr_with(mut self, name: &'static str, default: Value) -> Self {
        self.attrs.push(Attr {
            name,
            default: Some(default),
        });
        self
    }

    /// Layers another schema's attributes at this point in the declaration.
    ///
    /// Call first when deriving an extended type, so the base attributes bind
    /// before the type's own. A redeclared name is caught by [`Self::build`].
    pub fn extend(mut self, base: &Schema) -> Self {
        self.attrs.extend(base.attrs.iter().cloned());
        self
    }

    /// Validates uniqueness and freezes the schema.
    pub fn build(self) -> Result<Schema, ModelError> {
        let mut seen = HashSet::new();
        for attr in &self.attrs {
            if !seen.insert(attr.name) {
                return Err(ModelError::DuplicateAttribute {
                    entity: self.entity,
                    name: attr.name.to_string(),
                });
            }
        }
        Ok(Schema {
            entity: self.entity,
            attrs: self.attrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_declaration_order() {
        let schema = Schema::builder("Message")
            .attr("id")
            .attr("time")
            .attr("content")
            .build()
            .expect("Failed to build schema");

        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, ["id", "time", "content"]);
        assert_eq!(schema.position("time"), Some(1));
        assert!(schema.contains("content"));
        assert!(!schema.contains("sender"));
    }

    #[test]
    fn rejects_duplicate_attribute() {
        let result = Schema::builder("Message").attr("id").attr("id").build();
        assert!(matches!(
            result,
            Err(ModelError::DuplicateAttribute { entity: "Message", .. })
        ));
    }

    #[test]
    fn extend_layers_base_attributes_first() {
        let base = Schema::builder("Message")
            .attr("id")
            .attr("content")
            .build()
            .expect("Failed to build base schema");
        let schema = Schema::builder("FileMessage")
            .extend(&base)
            .attr("fileName")
            .build()
            .expect("Failed to build extended schema");

        let names: Vec<_> = schema.names().collect();
        assert_eq!(names, ["id", "content", "fileName"]);
    }

    #[test]
    fn extend_collision_is_rejected() {
        let base = Schema::builder("Message")
            .attr("id")
            .build()
            .expect("Failed to build base schema");
        let result = Schema::builder("FileMessage").extend(&base).attr("id").build();
        assert!(matches!(result, Err(ModelError::DuplicateAttribute { .. })));
    }

    #[test]
    fn defaults_attach_to_their_attribute() {
        let schema = Schema::builder("GroupChat")
            .attr("id")
            .attr_with("open", json!(false))
            .build()
            .expect("Failed to build schema");

        assert_eq!(schema.default_of("open"), Some(&json!(false)));
        assert_eq!(schema.default_of("id"), None);
    }
}
