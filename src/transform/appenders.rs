//! Per-keyword appenders.
//!
//! Each one looks at a single keyword and returns the descriptor fragment it
//! owns, or `None` when the keyword does not apply. Fragments never share
//! keys, so the order they are overlaid in does not change the result.
use crate::error::{Result, SchemaTableError};
use crate::field::FieldDescriptor;
use crate::schema::{Items, SchemaNode, TypeName};

use super::Transformer;
use super::types::map_type;

/// `{required: true}` when `field` is listed; absence means "not required".
pub fn append_required(field: &str, required: &[String]) -> Option<FieldDescriptor> {
    required.iter().any(|name| name == field).then(|| FieldDescriptor {
        required: Some(true),
        ..FieldDescriptor::default()
    })
}

pub fn append_enum(node: &SchemaNode) -> Option<FieldDescriptor> {
    let values = node.enum_values.as_ref().filter(|values| !values.is_empty())?;
    Some(FieldDescriptor { enum_values: Some(values.clone()), ..FieldDescriptor::default() })
}

/// Compile errors are handed back untouched.
pub fn append_pattern(node: &SchemaNode) -> Result<Option<FieldDescriptor>> {
    let Some(pattern) = node.pattern.as_deref() else { return Ok(None) };
    let validate = crate::field::Validator::new(pattern)?;
    Ok(Some(FieldDescriptor { validate: Some(validate), ..FieldDescriptor::default() }))
}

/// Array nodes with a single typed item schema get an `items` descriptor.
/// Tuple-form or untyped items yield nothing; the field stays a bare `Array`.
/// An item object that does not parse makes `field` invalid.
pub fn append_items(
    transformer: &Transformer,
    field: &str,
    node: &SchemaNode,
    depth: usize,
) -> Result<Option<FieldDescriptor>> {
    if !node.is_type(TypeName::Array) {
        return Ok(None);
    }
    if let Some(Items::Malformed(_)) = node.items {
        return Err(SchemaTableError::InvalidFieldDescription { field: field.to_string() });
    }
    let Some(item) = node.single_items() else { return Ok(None) };
    let Some(ty) = item.ty.as_ref() else { return Ok(None) };

    let mut descriptor = FieldDescriptor::of_type(map_type(ty));
    let fragments = [
        append_enum(item),
        append_pattern(item)?,
        append_schema(transformer, item, depth)?,
    ];
    for fragment in fragments.into_iter().flatten() {
        descriptor.overlay(fragment);
    }
    Ok(Some(FieldDescriptor { items: Some(Box::new(descriptor)), ..FieldDescriptor::default() }))
}

/// Object nodes that declare `properties` get a nested table one level down.
pub fn append_schema(
    transformer: &Transformer,
    node: &SchemaNode,
    depth: usize,
) -> Result<Option<FieldDescriptor>> {
    if !node.is_type(TypeName::Object) || node.properties.is_none() {
        return Ok(None);
    }
    let schema = transformer.derive_table(node, depth + 1)?;
    Ok(Some(FieldDescriptor { schema: Some(schema), ..FieldDescriptor::default() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldType, Validator};
    use serde_json::{Value, json};

    fn node(value: Value) -> SchemaNode {
        SchemaNode::from_value(value).unwrap()
    }

    #[test]
    fn required_only_when_listed() {
        let required = vec!["id".to_string()];
        assert_eq!(append_required("id", &required).unwrap().required, Some(true));
        assert!(append_required("name", &required).is_none());
        assert!(append_required("id", &[]).is_none());
    }

    #[test]
    fn enum_is_copied_in_order_and_empty_is_ignored() {
        let fragment = append_enum(&node(json!({ "type": "string", "enum": ["red", "green"] }))).unwrap();
        assert_eq!(fragment.enum_values, Some(vec![json!("red"), json!("green")]));
        assert!(append_enum(&node(json!({ "type": "string", "enum": [] }))).is_none());
        assert!(append_enum(&node(json!({ "type": "string" }))).is_none());
    }

    #[test]
    fn pattern_compiles_or_fails_verbatim() {
        let fragment = append_pattern(&node(json!({ "type": "string", "pattern": "abc" }))).unwrap().unwrap();
        assert_eq!(fragment.validate, Some(Validator::new("abc").unwrap()));

        let err = append_pattern(&node(json!({ "type": "string", "pattern": "[a-" }))).unwrap_err();
        assert_eq!(err.kind(), "Pattern");
        assert!(append_pattern(&node(json!({ "type": "string" }))).unwrap().is_none());
    }

    #[test]
    fn items_of_scalars_have_no_schema() {
        let t = Transformer::default();
        let fragment = append_items(&t, "tags", &node(json!({ "type": "array", "items": { "type": "string" } })), 0)
            .unwrap()
            .unwrap();
        assert_eq!(*fragment.items.unwrap(), FieldDescriptor::of_type(FieldType::String));
    }

    #[test]
    fn items_carry_enum_and_pattern() {
        let t = Transformer::default();
        let fragment = append_items(&t, "codes", &node(json!({
            "type": "array",
            "items": { "type": "string", "enum": ["a", "b"], "pattern": "^[ab]$" }
        })), 0)
        .unwrap()
        .unwrap();
        let items = fragment.items.unwrap();
        assert_eq!(items.enum_values, Some(vec![json!("a"), json!("b")]));
        assert_eq!(items.validate.as_ref().map(Validator::as_str), Some("^[ab]$"));
    }

    #[test]
    fn unsupported_items_contribute_nothing() {
        let t = Transformer::default();
        for schema in [
            json!({ "type": "array", "items": [{ "type": "string" }] }),
            json!({ "type": "array", "items": { "description": "untyped" } }),
            json!({ "type": "array" }),
            json!({ "type": "string", "items": { "type": "string" } }),
        ] {
            assert!(append_items(&t, "list", &node(schema), 0).unwrap().is_none());
        }
    }

    #[test]
    fn malformed_item_object_names_the_field() {
        let t = Transformer::default();
        for items in [
            json!({ "type": "string", "pattern": 5 }),
            json!({ "type": "date" }),
            json!({ "type": "object", "required": "id" }),
        ] {
            let err = append_items(&t, "tags", &node(json!({ "type": "array", "items": items })), 0).unwrap_err();
            match err {
                SchemaTableError::InvalidFieldDescription { field } => assert_eq!(field, "tags"),
                other => panic!("unexpected error: {other}"),
            }
        }
        let boolean = node(json!({ "type": "array", "items": false }));
        assert!(append_items(&t, "tags", &boolean, 0).unwrap().is_none());
    }

    #[test]
    fn schema_requires_object_with_properties() {
        let t = Transformer::default();
        assert!(append_schema(&t, &node(json!({ "type": "object" })), 0).unwrap().is_none());
        let fragment = append_schema(&t, &node(json!({
            "type": "object",
            "properties": { "name": { "type": "string" } }
        })), 0)
        .unwrap()
        .unwrap();
        assert_eq!(fragment.schema.unwrap()["name"].field_type, Some(FieldType::String));
    }
}
