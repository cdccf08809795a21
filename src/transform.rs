//! Schema → field table.
//!
//! Walk an object schema, build one [`FieldDescriptor`] per declared property
//! from the mapped type plus the keyword appenders, recurse into nested
//! objects (directly or through array items), then deep-merge the caller's
//! overrides on top.
//!
//! Policy:
//! - only object schemas produce a table; anything else is rejected
//! - `additionalProperties: true` is rejected wherever a table is derived
//! - unions and tuple-form `items` degrade instead of failing
//! - the call is pure; the same inputs always give an equal table
pub mod appenders;
pub mod types;

use tracing::{debug, trace};

use crate::error::{Result, SchemaTableError};
use crate::field::{FieldDescriptor, FieldTable, OverrideTable};
use crate::schema::{SchemaNode, TypeName};

use appenders::{append_enum, append_items, append_pattern, append_required, append_schema};
use types::map_type;

// ------------------------------- Policy ---------------------------------- //

/// Far above anything hand-written; only guards runaway generated schemas.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ------------------------------- Options --------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Nested-table levels allowed below the root (root is depth 0).
    pub max_depth: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

// ------------------------------ Front API -------------------------------- //

#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: TransformOptions,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn transform(&self, schema: &SchemaNode, overrides: Option<&OverrideTable>) -> Result<FieldTable> {
        let mut table = self.derive_table(schema, 0)?;
        if let Some(overrides) = overrides {
            debug!(overrides = overrides.len(), "merging override table");
            table.merge(overrides.clone());
        }
        Ok(table)
    }

    pub(crate) fn derive_table(&self, node: &SchemaNode, depth: usize) -> Result<FieldTable> {
        if depth > self.options.max_depth {
            return Err(SchemaTableError::SchemaTooDeep { limit: self.options.max_depth });
        }
        if !node.is_type(TypeName::Object) {
            return Err(SchemaTableError::UnsupportedSchemaShape { found: node.describe_type() });
        }
        if node.allows_additional_properties() {
            return Err(SchemaTableError::UnsupportedAdditionalProperties);
        }

        let mut table = FieldTable::new();
        for (name, property) in node.properties.iter().flatten() {
            let field = property
                .as_node()
                .filter(|field| field.ty.is_some())
                .ok_or_else(|| SchemaTableError::InvalidFieldDescription { field: name.clone() })?;
            let descriptor = self.describe_field(name, field, &node.required, depth)?;
            trace!(field = %name, depth, "derived field");
            table.insert(name.clone(), descriptor);
        }
        debug!(fields = table.len(), depth, "derived field table");
        Ok(table)
    }

    fn describe_field(
        &self,
        name: &str,
        field: &SchemaNode,
        required: &[String],
        depth: usize,
    ) -> Result<FieldDescriptor> {
        let Some(ty) = field.ty.as_ref() else {
            return Err(SchemaTableError::InvalidFieldDescription { field: name.to_string() });
        };
        let mut descriptor = FieldDescriptor::of_type(map_type(ty));
        let fragments = [
            append_required(name, required),
            append_enum(field),
            append_pattern(field)?,
            append_items(self, name, field, depth)?,
            append_schema(self, field, depth)?,
        ];
        for fragment in fragments.into_iter().flatten() {
            descriptor.overlay(fragment);
        }
        Ok(descriptor)
    }
}

/// Convert `schema` with default options.
pub fn transform(schema: &SchemaNode, overrides: Option<&OverrideTable>) -> Result<FieldTable> {
    Transformer::default().transform(schema, overrides)
}

// ------------------------------- Tests ------------------------------------ //
