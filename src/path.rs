//! Property-path resolution.
//!
//! A dotted selector such as `dept.manager.name` is walked segment by segment
//! against the schema. Relations followed by further segments become left
//! outer joins; embedded values and plain attributes are read in place.

use std::{fmt, mem};

use serde::{Serialize, Serializer};

use crate::{
    error::Error,
    schema::{Attribute, Cardinality, Schema, ValueType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Scalar or collection value
    Attribute,
    /// Structured value read by nested accessor
    Embedded,
    /// Related entity
    Relation(Cardinality),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub kind: SegmentKind,
}

/// A left outer join into a related entity.
///
/// The alias is the dotted path up to and including the relation, so every
/// path through the same relation shares the same join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Join {
    pub alias: String,

    /// Alias the join starts from, `None` for the root entity
    pub parent: Option<String>,

    /// Attributes read from the parent to reach the relation
    pub attributes: Vec<String>,

    pub cardinality: Cardinality,
}

impl Join {
    /// Number of segments in the alias; parents always come first
    pub fn depth(&self) -> usize {
        self.alias.split('.').count()
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.parent.as_deref().unwrap_or("root");
        write!(
            f,
            "left join \"{}\".{} as \"{}\"",
            parent,
            self.attributes.join("."),
            self.alias
        )
    }
}

/// Traversal plan for one selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    property: String,
    segments: Vec<Segment>,
    joins: Vec<Join>,
    accessor: Vec<String>,
    value_type: ValueType,
}

impl ResolvedPath {
    /// The selector as written
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Joins needed before the value can be read, outermost first
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Alias the value is read from, `None` for the root entity
    pub fn source(&self) -> Option<&str> {
        self.joins.last().map(|join| join.alias.as_str())
    }

    /// Attribute chain read from [`source`](Self::source)
    pub fn accessor(&self) -> &[String] {
        &self.accessor
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the path ends on a list value or a to-many relation
    pub fn is_collection(&self) -> bool {
        self.value_type == ValueType::List
            || matches!(
                self.segments.last(),
                Some(Segment {
                    kind: SegmentKind::Relation(Cardinality::ToMany),
                    ..
                })
            )
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source() {
            Some(alias) => write!(f, "\"{}\".{}", alias, self.accessor.join(".")),
            None => f.write_str(&self.accessor.join(".")),
        }
    }
}

impl Serialize for ResolvedPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.property)
    }
}

fn unknown(property: &str, segment: &str, entity: impl Into<String>) -> Error {
    Error::UnknownProperty {
        property: property.to_string(),
        segment: segment.to_string(),
        entity: entity.into(),
    }
}

/// Resolve `property` against `schema`.
pub fn resolve(schema: &dyn Schema, property: &str) -> Result<ResolvedPath, Error> {
    let names: Vec<&str> = property.split('.').collect();

    let mut current = schema;
    let mut segments = Vec::with_capacity(names.len());
    let mut joins = Vec::new();
    let mut accessor = Vec::new();
    let mut value_type = ValueType::Entity;

    for (i, name) in names.iter().copied().enumerate() {
        let last = i + 1 == names.len();
        if name.is_empty() {
            return Err(unknown(property, name, current.entity_name()));
        }

        let attribute = current
            .attribute(name)
            .ok_or_else(|| unknown(property, name, current.entity_name()))?;
        accessor.push(name.to_string());

        match attribute {
            Attribute::Basic(ty) => {
                segments.push(Segment {
                    name: name.to_string(),
                    kind: SegmentKind::Attribute,
                });
                if !last {
                    return Err(unknown(
                        property,
                        names[i + 1],
                        format!("{} value {}.{}", ty, current.entity_name(), name),
                    ));
                }
                value_type = ty;
            }
            Attribute::Embedded(inner) => {
                segments.push(Segment {
                    name: name.to_string(),
                    kind: SegmentKind::Embedded,
                });
                current = inner;
            }
            Attribute::Relation {
                cardinality,
                target,
            } => {
                segments.push(Segment {
                    name: name.to_string(),
                    kind: SegmentKind::Relation(cardinality),
                });
                if !last {
                    let parent = joins.last().map(|join: &Join| join.alias.clone());
                    joins.push(Join {
                        alias: names[..=i].join("."),
                        parent,
                        attributes: mem::take(&mut accessor),
                        cardinality,
                    });
                }
                current = target;
            }
        }
    }

    Ok(ResolvedPath {
        property: property.to_string(),
        segments,
        joins,
        accessor,
        value_type,
    })
}
