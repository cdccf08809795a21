//! Typed view of the JSON-Schema subset understood by the transformer.
//!
//! Only the keywords that feed a field descriptor are modelled; everything
//! else (`title`, `description`, `$schema`, `format`, ...) is ignored on
//! deserialization. Malformed property values are *not* rejected here: they
//! are kept as [`Property::Invalid`] so the transformer can report them with
//! the offending field name.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, SchemaTableError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// JSON-Schema primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

/// `type` is either one name or a union (`["string", "null"]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    Single(TypeName),
    Union(Vec<TypeName>),
}

/// One declared property. Anything that does not parse as a schema node
/// (a bare `true`, a string, a node with an unknown type name, ...) lands
/// in `Invalid`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Property {
    Node(Box<SchemaNode>),
    Invalid(Value),
}

/// `items` of an array node. Only `Single` carries item detail.
///
/// `Malformed` is an item object that fails to parse as a schema node; the
/// owning field is reported as invalid. Tuples and other values degrade.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Tuple(Vec<SchemaNode>),
    Single(Box<SchemaNode>),
    Malformed(Map<String, Value>),
    Unsupported(Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub ty: Option<TypeDecl>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    pub pattern: Option<String>,
    pub items: Option<Items>,
    pub properties: Option<IndexMap<String, Property>>,
    #[serde(default)]
    pub required: Vec<String>,
    /// Boolean in practice; a schema value is accepted and treated as "not true".
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<Value>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl TypeDecl {
    /// Readable form for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Single(name) => name.as_str().to_string(),
            Self::Union(names) => {
                let names = names.iter().map(|n| n.as_str()).collect::<Vec<_>>();
                format!("[{}]", names.join(", "))
            }
        }
    }
}

impl Property {
    pub fn as_node(&self) -> Option<&SchemaNode> {
        match self {
            Self::Node(node) => Some(node.as_ref()),
            Self::Invalid(_) => None,
        }
    }
}

impl SchemaNode {
    /// A root that is not an object, or whose `type` is not a JSON-Schema
    /// type name, is an unsupported shape rather than a parse error.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(found) = unsupported_root(&value) {
            return Err(SchemaTableError::UnsupportedSchemaShape { found });
        }
        crate::path_de::from_value_with_path(value)
    }

    pub fn from_str(src: &str) -> Result<Self> {
        let value: Value = crate::path_de::from_str_with_path(src)?;
        Self::from_value(value)
    }

    /// True only for a single, non-union `type` equal to `name`.
    pub fn is_type(&self, name: TypeName) -> bool {
        matches!(self.ty, Some(TypeDecl::Single(found)) if found == name)
    }

    pub fn allows_additional_properties(&self) -> bool {
        matches!(self.additional_properties, Some(Value::Bool(true)))
    }

    /// The single item schema, if `items` has the supported shape.
    pub fn single_items(&self) -> Option<&SchemaNode> {
        match self.items.as_ref()? {
            Items::Single(node) => Some(node.as_ref()),
            Items::Tuple(_) | Items::Malformed(_) | Items::Unsupported(_) => None,
        }
    }

    pub fn describe_type(&self) -> String {
        self.ty
            .as_ref()
            .map(TypeDecl::describe)
            .unwrap_or_else(|| "no type".to_string())
    }
}

fn unsupported_root(value: &Value) -> Option<String> {
    let found = match value {
        Value::Object(object) => {
            let ty = object.get("type")?;
            if TypeDecl::deserialize(ty).is_ok() {
                return None;
            }
            return Some(ty.to_string());
        }
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
    };
    Some(format!("{found} value"))
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
