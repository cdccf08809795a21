//! Output side: field descriptors and the field table handed to the
//! table-mapping layer.
//!
//! The same [`FieldDescriptor`] shape is used for derived fields, for the
//! small fragments the appenders produce, and for caller-supplied overrides,
//! which is why every key is optional.
use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::Result;
use crate::schema::TypeName;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Type universe of the table-mapping layer.
///
/// The transformer only ever produces the first six tags; `Date`, `Set` and
/// `Binary` exist so overrides can request them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    #[serde(rename = "null")]
    Null,
    Date,
    Set,
    Binary,
}

/// A compiled `pattern`. Compares and serializes by its source text.
#[derive(Debug, Clone)]
pub struct Validator(Regex);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<Validator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<FieldTable>,
    /// Keys the transformer knows nothing about (`generate`, `hidden`, ...).
    /// Only overrides put anything here.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Property name → descriptor, in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTable(IndexMap<String, FieldDescriptor>);

/// Partial descriptors keyed by property name, deep-merged over a derived table.
pub type OverrideTable = FieldTable;

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl From<TypeName> for FieldType {
    fn from(name: TypeName) -> Self {
        match name {
            TypeName::String => FieldType::String,
            TypeName::Number | TypeName::Integer => FieldType::Number,
            TypeName::Boolean => FieldType::Boolean,
            TypeName::Object => FieldType::Object,
            TypeName::Array => FieldType::Array,
            TypeName::Null => FieldType::Null,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
            FieldType::Object => "Object",
            FieldType::Array => "Array",
            FieldType::Null => "null",
            FieldType::Date => "Date",
            FieldType::Set => "Set",
            FieldType::Binary => "Binary",
        };
        f.write_str(tag)
    }
}

impl Validator {
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl From<Regex> for Validator {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

impl PartialEq for Validator {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Validator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Validator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Validator::new(&pattern).map_err(serde::de::Error::custom)
    }
}

impl FieldDescriptor {
    pub fn of_type(field_type: FieldType) -> Self {
        Self { field_type: Some(field_type), ..Self::default() }
    }

    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }

    /// Shallow merge: every key set in `fragment` replaces ours wholesale.
    pub fn overlay(&mut self, fragment: FieldDescriptor) {
        let FieldDescriptor { field_type, required, enum_values, validate, default, items, schema, extra } = fragment;
        if field_type.is_some() { self.field_type = field_type; }
        if required.is_some() { self.required = required; }
        if enum_values.is_some() { self.enum_values = enum_values; }
        if validate.is_some() { self.validate = validate; }
        if default.is_some() { self.default = default; }
        if items.is_some() { self.items = items; }
        if schema.is_some() { self.schema = schema; }
        self.extra.extend(extra);
    }
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an override table (or a previously serialized field table).
    pub fn from_value(value: Value) -> Result<Self> {
        crate::path_de::from_value_with_path(value)
    }

    pub fn from_str(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Option<FieldDescriptor> {
        self.0.insert(name.into(), descriptor)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, FieldDescriptor> {
        self.0.iter()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut IndexMap<String, FieldDescriptor> {
        &mut self.0
    }
}

impl Index<&str> for FieldTable {
    type Output = FieldDescriptor;

    fn index(&self, name: &str) -> &FieldDescriptor {
        &self.0[name]
    }
}

impl IntoIterator for FieldTable {
    type Item = (String, FieldDescriptor);
    type IntoIter = indexmap::map::IntoIter<String, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldTable {
    type Item = (&'a String, &'a FieldDescriptor);
    type IntoIter = indexmap::map::Iter<'a, String, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDescriptor)> for FieldTable {
    fn from_iter<I: IntoIterator<Item = (K, FieldDescriptor)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
