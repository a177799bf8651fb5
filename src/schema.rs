//! Entity descriptions the compiler resolves property paths against.
//!
//! The compiler only talks to the [`Schema`] trait. Callers with their own
//! metamodel implement it once per entity type; everyone else can describe
//! entities with [`EntitySchema`], which also deserializes from JSON:
//!
//! ```
//! use rsql_filter::schema::{EntitySchema, ValueType};
//!
//! let schema = EntitySchema::from_json(r#"{
//!     "name": "Employee",
//!     "attributes": {
//!         "name": { "kind": "basic", "type": "string" },
//!         "dept": { "kind": "to_one", "target": {
//!             "name": "Department",
//!             "attributes": { "title": { "kind": "basic", "type": "string" } }
//!         } }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(schema, EntitySchema::new("Employee")
//!     .basic("name", ValueType::String)
//!     .to_one("dept", EntitySchema::new("Department").basic("title", ValueType::String)));
//! ```

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Semantic type of a property, driving argument coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 8-bit signed integer
    Byte,
    Boolean,
    /// Calendar date without time of day
    Date,
    /// Date and time of day, no zone
    DateTime,
    String,
    /// Collection of scalar values
    List,
    /// The path ends on a related entity or an embedded value
    Entity,
    /// Any other scalar type, compared as text
    Other,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Integer => "integer",
            ValueType::Long => "long",
            ValueType::Byte => "byte",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::DateTime => "date-time",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Entity => "entity",
            ValueType::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// What a single path segment denotes on an entity.
#[derive(Clone, Copy)]
pub enum Attribute<'a> {
    /// Plain scalar or collection value
    Basic(ValueType),

    /// Structured value stored with its owner, read by nested accessor
    Embedded(&'a dyn Schema),

    /// Another entity, reached through a left outer join
    Relation {
        cardinality: Cardinality,
        target: &'a dyn Schema,
    },
}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Basic(ty) => f.debug_tuple("Basic").field(ty).finish(),
            Attribute::Embedded(schema) => f
                .debug_tuple("Embedded")
                .field(&schema.entity_name())
                .finish(),
            Attribute::Relation {
                cardinality,
                target,
            } => f
                .debug_struct("Relation")
                .field("cardinality", cardinality)
                .field("target", &target.entity_name())
                .finish(),
        }
    }
}

/// Capability the compiler needs from a caller's metamodel.
///
/// Implementations must not change while a compile is in flight.
pub trait Schema: Send + Sync {
    /// Name used in error messages
    fn entity_name(&self) -> &str;

    /// Look up one path segment. `None` means the property does not exist.
    fn attribute(&self, name: &str) -> Option<Attribute<'_>>;
}

/// Owned, serde-friendly [`Schema`] implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeDef {
    Basic {
        #[serde(rename = "type")]
        value_type: ValueType,
    },
    Embedded {
        schema: EntitySchema,
    },
    ToOne {
        target: EntitySchema,
    },
    ToMany {
        target: EntitySchema,
    },
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        EntitySchema {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with(mut self, name: impl Into<String>, def: AttributeDef) -> Self {
        self.attributes.insert(name.into(), def);
        self
    }

    pub fn basic(self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.with(name, AttributeDef::Basic { value_type })
    }

    pub fn embedded(self, name: impl Into<String>, schema: EntitySchema) -> Self {
        self.with(name, AttributeDef::Embedded { schema })
    }

    pub fn to_one(self, name: impl Into<String>, target: EntitySchema) -> Self {
        self.with(name, AttributeDef::ToOne { target })
    }

    pub fn to_many(self, name: impl Into<String>, target: EntitySchema) -> Self {
        self.with(name, AttributeDef::ToMany { target })
    }
}

impl Schema for EntitySchema {
    fn entity_name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        let attribute = match self.attributes.get(name)? {
            AttributeDef::Basic { value_type } => Attribute::Basic(*value_type),
            AttributeDef::Embedded { schema } => Attribute::Embedded(schema),
            AttributeDef::ToOne { target } => Attribute::Relation {
                cardinality: Cardinality::ToOne,
                target,
            },
            AttributeDef::ToMany { target } => Attribute::Relation {
                cardinality: Cardinality::ToMany,
                target,
            },
        };
        Some(attribute)
    }
}
