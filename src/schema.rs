//! # Schema Trees
//!
//! A schema describes one data entity as nested field names ending in type
//! tags. The raw JSON is walked once, depth-first in document order, and turned
//! into a [`SchemaNode`] tree. The walk stops at the first leaf whose tag is not
//! in the registry and reports that leaf's dotted path.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::descriptor::FieldType;
use crate::types::FormgenError;

/// Either a typed leaf or a mapping of field name to child node.
///
/// Child order follows the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Leaf(FieldType),
    Node(Vec<(String, SchemaNode)>),
}

/// A field reached by flattening a schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField<'a> {
    pub path: String,
    pub field_type: &'a FieldType,
}

impl SchemaNode {
    /// Builds a tree from a `schema` value, validating every leaf.
    ///
    /// The root must be an object. Leaves must be strings whose base tag is in
    /// the registry; any other leaf value is reported as an invalid tag.
    pub fn from_value(value: &Value) -> Result<Self, FormgenError> {
        match value {
            Value::Object(map) => Self::walk(map, ""),
            _ => Err(FormgenError::SchemaShape),
        }
    }

    fn walk(map: &Map<String, Value>, parent: &str) -> Result<Self, FormgenError> {
        let mut children = Vec::with_capacity(map.len());
        for (key, value) in map {
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", parent, key)
            };

            let child = match value {
                Value::Object(inner) => Self::walk(inner, &path)?,
                Value::String(tag) => {
                    let field_type = FieldType::parse(tag).map_err(|_| {
                        debug!(path = %path, tag = %tag, "unknown schema type");
                        FormgenError::schema_type(&path, tag)
                    })?;
                    SchemaNode::Leaf(field_type)
                }
                other => return Err(FormgenError::schema_type(&path, other.to_string())),
            };
            children.push((key.clone(), child));
        }
        Ok(SchemaNode::Node(children))
    }

    /// Direct children of a node; empty for a leaf.
    pub fn children(&self) -> &[(String, SchemaNode)] {
        match self {
            SchemaNode::Node(children) => children,
            SchemaNode::Leaf(_) => &[],
        }
    }

    /// Looks up a node by dotted path.
    pub fn get(&self, path: &str) -> Option<&SchemaNode> {
        path.split('.').try_fold(self, |node, segment| {
            node.children()
                .iter()
                .find(|(key, _)| key == segment)
                .map(|(_, child)| child)
        })
    }

    /// Every leaf with its dotted path, in document order.
    pub fn fields(&self) -> Vec<SchemaField<'_>> {
        let mut out = Vec::new();
        self.collect_fields("", &mut out);
        out
    }

    fn collect_fields<'a>(&'a self, parent: &str, out: &mut Vec<SchemaField<'a>>) {
        for (key, child) in self.children() {
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", parent, key)
            };
            match child {
                SchemaNode::Leaf(field_type) => out.push(SchemaField { path, field_type }),
                SchemaNode::Node(_) => child.collect_fields(&path, out),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    pub fn to_value(&self) -> Value {
        match self {
            SchemaNode::Leaf(field_type) => Value::String(field_type.as_str().to_string()),
            SchemaNode::Node(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect(),
            ),
        }
    }
}

impl Default for SchemaNode {
    fn default() -> Self {
        SchemaNode::Node(Vec::new())
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SchemaNode::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Checks a raw `schema` value without keeping the tree.
pub fn validate_schema(value: &Value) -> Result<(), FormgenError> {
    SchemaNode::from_value(value).map(|_| ())
}
