//! Turn a JSON-Schema object contract into the field table a key-value
//! table-mapping layer expects.
//!
//! ```
//! use json_schema_table::{SchemaNode, FieldType, transform};
//!
//! let schema = SchemaNode::from_str(r#"{
//!     "type": "object",
//!     "properties": { "id": { "type": "string" }, "age": { "type": "integer" } },
//!     "required": ["id"]
//! }"#).unwrap();
//! let table = transform(&schema, None).unwrap();
//! assert_eq!(table["age"].field_type, Some(FieldType::Number));
//! assert!(table["id"].is_required());
//! ```
pub mod error;
pub mod field;
pub mod merge;
pub mod schema;
pub mod transform;
pub mod cli;
pub mod jq_exec;
pub mod logging;
pub mod path_de;

pub use error::{Result, SchemaTableError};
pub use field::{FieldDescriptor, FieldTable, FieldType, OverrideTable, Validator};
pub use schema::{SchemaNode, TypeDecl, TypeName};
pub use transform::{TransformOptions, Transformer, transform};
