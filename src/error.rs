//! Error types for schema → field-table conversion.

use thiserror::Error;

/// Every failure aborts the whole conversion; no partial table is returned.
#[derive(Debug, Error)]
pub enum SchemaTableError {
    /// A table was requested from a node that is not `type: "object"`.
    #[error("only object schemas can be converted to a field table (found {found})")]
    UnsupportedSchemaShape { found: String },
    /// The object node sets `additionalProperties: true`.
    #[error("additionalProperties=true is not supported")]
    UnsupportedAdditionalProperties,
    /// A property value is not a schema object, or it has no `type`.
    #[error("description for field \"{field}\" is not valid")]
    InvalidFieldDescription { field: String },
    /// Object nesting went past `TransformOptions::max_depth`.
    #[error("schema nesting exceeds the maximum depth of {limit}")]
    SchemaTooDeep { limit: usize },
    #[error(transparent)]
    Pattern(#[from] regex::Error),
    /// Deserialization failed; `path` is the JSON path of the offending node.
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },
}

impl SchemaTableError {
    /// Stable variant name, used by fixtures to assert on failures.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedSchemaShape { .. } => "UnsupportedSchemaShape",
            Self::UnsupportedAdditionalProperties => "UnsupportedAdditionalProperties",
            Self::InvalidFieldDescription { .. } => "InvalidFieldDescription",
            Self::SchemaTooDeep { .. } => "SchemaTooDeep",
            Self::Pattern(_) => "Pattern",
            Self::Parse { .. } => "Parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaTableError>;
